pub mod console_messenger;

pub use console_messenger::ConsoleMessenger;
