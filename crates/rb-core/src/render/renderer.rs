use super::page::{
    page_count, page_range, Button, Embed, RenderedPage, NEXT_BUTTON_ID, PREVIOUS_BUTTON_ID,
};
use crate::computation::{ComputationResult, ScoreRecord};
use crate::ids::UserId;

const BEATMAP_URL: &str = "https://osu.ppy.sh/b/";

/// Render one page of `result` for `requester`.
///
/// Pure: the same inputs always produce the same page, so re-rendering after
/// navigation is idempotent. A page past the end renders the header with no
/// score lines; bounds are enforced by the cache, not here.
pub fn render_page(result: &ComputationResult, page: usize, requester: &UserId) -> RenderedPage {
    let item_range = page_range(page, result.scores.len());

    let score_lines: Vec<String> = item_range
        .clone()
        .map(|idx| format_score(idx, &result.scores[idx]))
        .collect();

    let description = format!(
        "**Live pp:** `{}pp`\n**Local pp:** `{}pp` ({}pp difference)\n**Playcount pp:** `{}pp`\n\n__**Scores:**__\n{}",
        fixed2(result.live_pp),
        fixed2(result.local_pp),
        signed(result.pp_difference()),
        fixed2(result.playcount_pp),
        score_lines.join("\n"),
    );

    RenderedPage {
        content: format!("<@{}>", requester),
        embed: Embed {
            title: format!("{}'s Rework Statistics", result.username),
            description,
            footer: format!("Page {}/{}", page + 1, page_count(result.scores.len())),
        },
        buttons: vec![
            Button {
                custom_id: PREVIOUS_BUTTON_ID.to_string(),
                label: "<-".to_string(),
            },
            Button {
                custom_id: NEXT_BUTTON_ID.to_string(),
                label: "->".to_string(),
            },
        ],
        page,
        item_range,
    }
}

fn format_score(idx: usize, score: &ScoreRecord) -> String {
    let mods = if score.mods.is_empty() {
        "NM".to_string()
    } else {
        score.mods.concat()
    };

    format!(
        "`#{}` [**{}**]({}{})\n**Live/Local pp:** `{}pp`-`{}pp` ({}) • `+{}` • `{}x`\n**Accuracy**: `{}%` • **Misses:** `{}` • **Position Change:** `{}`",
        idx + 1,
        score.beatmap_name,
        BEATMAP_URL,
        score.beatmap_id,
        fixed2(score.live_pp),
        fixed2(score.local_pp),
        signed(score.pp_difference()),
        mods,
        group_thousands(score.combo),
        fixed2(score.accuracy),
        score.miss_count,
        score.position_change,
    )
}

fn fixed2(value: f64) -> String {
    format!("{:.2}", value)
}

/// Two decimals, `+` when the rounded value is positive; never `-0.00`.
fn signed(value: f64) -> String {
    let hundredths = (value * 100.0).round();
    if hundredths > 0.0 {
        format!("+{:.2}", value)
    } else if hundredths == 0.0 {
        "0.00".to_string()
    } else {
        format!("{:.2}", value)
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
