use regex::Regex;
use std::sync::OnceLock;

fn sentence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"([.!?]+\s+)").expect("sentence pattern is valid"))
}

/// Split text into batches that respect sentence boundaries.
/// Each batch is at most `max_chars` characters; sentences longer than that
/// are split on character boundaries.
pub fn split_into_batches(text: &str, max_chars: usize) -> Vec<String> {
    if text.chars().count() <= max_chars {
        return vec![text.to_string()];
    }

    let mut batches = Vec::new();
    let mut current_batch = String::new();
    let mut last_end = 0;

    let mut pieces: Vec<&str> = sentence_pattern()
        .find_iter(text)
        .map(|mat| {
            let sentence = &text[last_end..mat.end()];
            last_end = mat.end();
            sentence
        })
        .collect();
    if last_end < text.len() {
        pieces.push(&text[last_end..]);
    }

    for piece in pieces {
        let piece_len = piece.chars().count();

        // If adding this sentence would exceed the limit, save current batch
        if !current_batch.is_empty() && current_batch.chars().count() + piece_len > max_chars {
            push_trimmed(&mut batches, &current_batch);
            current_batch.clear();
        }

        if piece_len > max_chars {
            let chars: Vec<char> = piece.chars().collect();
            for chunk in chars.chunks(max_chars) {
                push_trimmed(&mut batches, &chunk.iter().collect::<String>());
            }
        } else {
            current_batch.push_str(piece);
        }
    }

    push_trimmed(&mut batches, &current_batch);

    batches
}

fn push_trimmed(batches: &mut Vec<String>, batch: &str) {
    let trimmed = batch.trim();
    if !trimmed.is_empty() {
        batches.push(trimmed.to_string());
    }
}
