use flashdeck_lib::flashcards::Card;

/// ANSI color codes
#[allow(dead_code)]
pub struct Color;

#[allow(dead_code)]
impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
}

/// Wrap `text` in a color when colors are enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Render a card's front: question plus question image, if any
pub fn render_question(card: &Card, use_color: bool) -> String {
    let mut lines = vec![paint(&card.question, Color::BOLD, use_color)];
    if let Some(ref image) = card.question_image {
        lines.push(paint(&format!("[image: {}]", shorten(image)), Color::DIM, use_color));
    }
    lines.join("\n")
}

/// Render a card's back: answer plus answer image, if any
pub fn render_answer(card: &Card, use_color: bool) -> String {
    let mut lines = vec![paint(&card.answer, Color::CYAN, use_color)];
    if let Some(ref image) = card.answer_image {
        lines.push(paint(&format!("[image: {}]", shorten(image)), Color::DIM, use_color));
    }
    lines.join("\n")
}

/// Keep long image references readable on one line
fn shorten(reference: &str) -> String {
    const MAX: usize = 60;
    if reference.chars().count() <= MAX {
        reference.to_string()
    } else {
        let head: String = reference.chars().take(MAX).collect();
        format!("{}...", head)
    }
}
