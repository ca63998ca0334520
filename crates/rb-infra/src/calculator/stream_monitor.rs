use rb_core::ProgressEvent;

/// JSON field name, quoted, that only appears in the final `-j` payload.
pub const COMPLETION_MARKER: &[u8] = b"\"Username\"";

/// Watches calculator stdout chunk by chunk.
///
/// Emits a heartbeat on the first chunk and on every `progress_every`-th
/// chunk after it, and remembers whether the completion marker went by.
/// The marker may straddle two chunks.
#[derive(Debug)]
pub struct StreamMonitor {
    progress_every: u64,
    chunks_read: u64,
    marker_seen: bool,
    /// Tail of the previous chunk, shorter than the marker
    carry: Vec<u8>,
}

impl StreamMonitor {
    pub fn new(progress_every: u64) -> Self {
        Self {
            progress_every: progress_every.max(1),
            chunks_read: 0,
            marker_seen: false,
            carry: Vec::new(),
        }
    }

    pub fn feed(&mut self, chunk: &[u8]) -> Option<ProgressEvent> {
        if chunk.is_empty() {
            return None;
        }
        self.chunks_read += 1;
        self.scan_for_marker(chunk);

        let heartbeat = self.chunks_read == 1 || (self.chunks_read - 1) % self.progress_every == 0;
        heartbeat.then(|| ProgressEvent::from_chunks(self.chunks_read))
    }

    pub fn marker_seen(&self) -> bool {
        self.marker_seen
    }

    pub fn chunks_read(&self) -> u64 {
        self.chunks_read
    }

    fn scan_for_marker(&mut self, chunk: &[u8]) {
        if self.marker_seen {
            return;
        }
        let mut window = std::mem::take(&mut self.carry);
        window.extend_from_slice(chunk);

        if window
            .windows(COMPLETION_MARKER.len())
            .any(|w| w == COMPLETION_MARKER)
        {
            self.marker_seen = true;
            return;
        }

        let keep = COMPLETION_MARKER.len() - 1;
        let start = window.len().saturating_sub(keep);
        self.carry = window[start..].to_vec();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_chunk_and_every_nth_emit_progress() {
        let mut monitor = StreamMonitor::new(15);

        let emitted: Vec<u64> = (0..40)
            .filter_map(|_| monitor.feed(b"line\n"))
            .map(|p| p.chunks_read)
            .collect();

        assert_eq!(emitted, vec![1, 16, 31]);
    }

    #[test]
    fn empty_chunks_are_ignored() {
        let mut monitor = StreamMonitor::new(1);

        assert!(monitor.feed(b"").is_none());
        assert_eq!(monitor.chunks_read(), 0);
    }

    #[test]
    fn detects_marker_inside_a_chunk() {
        let mut monitor = StreamMonitor::new(15);
        monitor.feed(b"Calculating...\n");
        assert!(!monitor.marker_seen());

        monitor.feed(b"{ \"Username\": \"mrekk\" }\n");

        assert!(monitor.marker_seen());
    }

    #[test]
    fn detects_marker_split_across_chunks() {
        let mut monitor = StreamMonitor::new(15);
        monitor.feed(b"{ \"User");
        monitor.feed(b"name\": \"mrekk\" }");

        assert!(monitor.marker_seen());
    }

    #[test]
    fn bare_word_in_log_output_is_not_the_marker() {
        let mut monitor = StreamMonitor::new(15);
        monitor.feed(b"Unhandled exception: Username lookup failed (HTTP 503)\n");

        assert!(!monitor.marker_seen());
    }

    #[test]
    fn tiny_chunks_still_find_the_marker() {
        let mut monitor = StreamMonitor::new(15);
        for byte in b"xx\"Username\"xx" {
            monitor.feed(std::slice::from_ref(byte));
        }

        assert!(monitor.marker_seen());
    }
}
