//! Discord message-limit utilities
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.0.0: Initial creation with chunking and truncation helpers

/// Discord message content limit
pub const MESSAGE_LIMIT: usize = 2000;

/// Split text into pieces that fit a Discord message.
///
/// Prefers splitting at line boundaries; a single line longer than the limit
/// is split at UTF-8 character boundaries.
pub fn chunk_for_message(text: &str) -> Vec<String> {
    chunk_text(text, MESSAGE_LIMIT)
}

fn chunk_text(text: &str, max_size: usize) -> Vec<String> {
    if text.len() <= max_size {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        // +1 for the newline that joins lines back together
        if !current.is_empty() && current.len() + line.len() + 1 > max_size {
            chunks.push(std::mem::take(&mut current));
        }

        if line.len() > max_size {
            // Oversized single line: split on char boundaries
            for ch in line.chars() {
                if current.len() + ch.len_utf8() > max_size {
                    chunks.push(std::mem::take(&mut current));
                }
                current.push(ch);
            }
        } else {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Truncate text to the message limit, appending an ellipsis when cut.
pub fn truncate_for_message(text: &str) -> String {
    if text.len() <= MESSAGE_LIMIT {
        return text.to_string();
    }
    let mut end = MESSAGE_LIMIT - 3;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
