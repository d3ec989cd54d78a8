//! Paragraph-aware message splitting.
//!
//! Long notification bodies are cut into pieces that each fit a push. The
//! splitter packs whole paragraphs first and only falls back to sentence,
//! word and finally raw character boundaries when a paragraph alone is too
//! long. A short paragraph that closes one chunk is repeated at the head of
//! the next so each push still reads in context.
//!
//! All lengths are counted in chars, not bytes.

const PARAGRAPH_SEPARATOR: &str = "\n\n";
const SENTENCE_TERMINATOR: &str = ". ";

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Budget left for the body once `reserve_space` chars of numbering are taken.
///
/// A reservation that eats the whole budget is ignored.
pub fn effective_budget(max_length: usize, reserve_space: usize) -> usize {
    let budget = match max_length.checked_sub(reserve_space) {
        Some(b) if b > 0 => b,
        _ => max_length,
    };
    budget.max(1)
}

/// Split `message` into chunks of at most `max_length - reserve_space` chars.
pub fn split_message(message: &str, max_length: usize, reserve_space: usize) -> Vec<String> {
    if message.is_empty() {
        return Vec::new();
    }

    let budget = effective_budget(max_length, reserve_space);
    if char_len(message) <= budget {
        return vec![message.to_string()];
    }

    Splitter::new(budget).run(message)
}

/// Accumulation state for one pass over the paragraphs.
struct Splitter {
    budget: usize,
    chunks: Vec<String>,
    current: String,
    previous: String,
}

impl Splitter {
    fn new(budget: usize) -> Self {
        Self {
            budget,
            chunks: Vec::new(),
            current: String::new(),
            previous: String::new(),
        }
    }

    fn run(mut self, message: &str) -> Vec<String> {
        for paragraph in message.split(PARAGRAPH_SEPARATOR) {
            if self.should_overlap() && self.merge_with_overlap(paragraph) {
                self.previous = paragraph.to_string();
                continue;
            }
            self.push_paragraph(paragraph);
        }

        if !self.current.trim().is_empty() {
            self.chunks.push(self.current);
        }
        self.chunks
    }

    fn is_short(&self, paragraph: &str) -> bool {
        !paragraph.is_empty() && char_len(paragraph) < self.budget / 3
    }

    fn should_overlap(&self) -> bool {
        !self.chunks.is_empty() && self.is_short(&self.previous)
    }

    /// Fast path: carry the previous short paragraph along with this one.
    ///
    /// Returns false when the pair does not fit and the paragraph still has
    /// to go through the regular packing.
    fn merge_with_overlap(&mut self, paragraph: &str) -> bool {
        let with_overlap = join_paragraphs(&self.previous, paragraph);
        if char_len(&with_overlap) > self.budget {
            return false;
        }

        if self.current.is_empty() {
            self.current = with_overlap;
            return true;
        }

        let combined = join_paragraphs(&self.current, &with_overlap);
        if char_len(&combined) > self.budget {
            let closed = std::mem::replace(&mut self.current, with_overlap);
            self.chunks.push(closed);
        } else {
            self.current = combined;
        }
        true
    }

    fn push_paragraph(&mut self, paragraph: &str) {
        let candidate = if self.current.is_empty() {
            paragraph.to_string()
        } else {
            join_paragraphs(&self.current, paragraph)
        };

        if char_len(&candidate) <= self.budget {
            self.current = candidate;
            self.previous = paragraph.to_string();
            return;
        }

        let mut next = paragraph.to_string();
        if !self.current.is_empty() {
            let closed = std::mem::take(&mut self.current);
            self.chunks.push(closed);

            if self.is_short(&self.previous) {
                let with_overlap = join_paragraphs(&self.previous, paragraph);
                if char_len(&with_overlap) <= self.budget {
                    next = with_overlap;
                }
            }
        }

        if char_len(&next) > self.budget {
            let mut pieces = split_by_sentences(&next, self.budget);
            if let Some(last) = pieces.pop() {
                self.chunks.extend(pieces);
                next = last;
            }
        }

        self.current = next;
        self.previous = paragraph.to_string();
    }
}

fn join_paragraphs(head: &str, tail: &str) -> String {
    format!("{head}{PARAGRAPH_SEPARATOR}{tail}")
}

/// Pack sentences (split after `". "`) into pieces of at most `max_length`.
pub fn split_by_sentences(text: &str, max_length: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for sentence in sentences(text) {
        if char_len(sentence) > max_length {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            let mut word_chunks = split_by_words(sentence, max_length);
            if let Some(last) = word_chunks.pop() {
                chunks.extend(word_chunks);
                current = last;
            }
            continue;
        }

        let candidate = if current.is_empty() {
            sentence.to_string()
        } else {
            format!("{current} {sentence}")
        };

        if char_len(&candidate) <= max_length {
            current = candidate;
        } else {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            current = sentence.to_string();
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Sentences keep their terminating period; the following space is dropped.
fn sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive(SENTENCE_TERMINATOR)
        .map(|s| s.strip_suffix(' ').filter(|t| t.ends_with('.')).unwrap_or(s))
        .filter(|s| !s.is_empty())
}

/// Pack space-separated words into pieces of at most `max_length`.
pub fn split_by_words(text: &str, max_length: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for word in text.split(' ') {
        if char_len(word) > max_length {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            chunks.extend(split_by_characters(word, max_length));
            continue;
        }

        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if char_len(&candidate) <= max_length {
            current = candidate;
        } else {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Cut `text` into runs of exactly `max_length` chars (the last may be shorter).
pub fn split_by_characters(text: &str, max_length: usize) -> Vec<String> {
    let width = max_length.max(1);
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(width)
        .map(|run| run.iter().collect())
        .collect()
}

/// Prefix `title` with `[part/total] ` when a message goes out in several parts.
pub fn add_part_number(title: &str, part: usize, total: usize) -> String {
    if total <= 1 {
        return title.to_string();
    }
    format!("[{}/{}] {}", part, total, title)
}

// ============================================================================
// Tests
// ============================================================================
