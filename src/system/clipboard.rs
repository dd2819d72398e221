use cli_clipboard::{ClipboardContext, ClipboardProvider};

use super::automation::ClipboardWriter;
use crate::shared::errors::{BridgeError, BridgeResult};

/// Writes through to the device-wide clipboard
#[derive(Default, Clone, Copy)]
pub struct SystemClipboard;

impl ClipboardWriter for SystemClipboard {
    fn write_text(&self, text: &str) -> BridgeResult<()> {
        let mut ctx = ClipboardContext::new()
            .map_err(|e| BridgeError::Clipboard(format!("Failed to open clipboard: {}", e)))?;
        ctx.set_contents(text.to_owned())
            .map_err(|e| BridgeError::Clipboard(format!("Failed to write to clipboard: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore] // Only run manually as it overwrites the system clipboard
    fn test_write_system_clipboard() {
        match SystemClipboard.write_text("assistive-bridge clipboard test") {
            Ok(()) => {
                let mut ctx = ClipboardContext::new().unwrap();
                assert_eq!(ctx.get_contents().unwrap(), "assistive-bridge clipboard test");
            }
            Err(e) => println!("Error (may need a display server): {}", e),
        }
    }
}
