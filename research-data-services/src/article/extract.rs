use scraper::{Html, Selector};

/// Content region of a news article page.
pub const ARTICLE_SELECTOR: &str = "article#dic_area.go_trans._article_content";

/// Elements whose text is not part of the article body (captions, bylines,
/// embedded widgets).
pub const DROPPED_TAGS: [&str; 4] = ["img", "em", "span", "div"];

/// Body text of the article region, whitespace-collapsed. `None` when the
/// page has no article region or the region carries no text.
pub fn extract_article_text(html: &str) -> Option<String> {
    let selector = Selector::parse(ARTICLE_SELECTOR).ok()?;
    let document = Html::parse_document(html);
    let article = document.select(&selector).next()?;
    let article_id = article.id();

    let mut pieces: Vec<&str> = Vec::new();
    for node in article.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let dropped = node
            .ancestors()
            .take_while(|ancestor| ancestor.id() != article_id)
            .filter_map(|ancestor| ancestor.value().as_element())
            .any(|element| DROPPED_TAGS.contains(&element.name()));
        if !dropped {
            pieces.push(text);
        }
    }

    let collapsed = pieces
        .iter()
        .flat_map(|piece| piece.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ");

    (!collapsed.is_empty()).then_some(collapsed)
}

/// Keep at most `max_tokens` whitespace-delimited tokens.
pub fn truncate_tokens(text: &str, max_tokens: usize) -> String {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() <= max_tokens {
        return text.to_string();
    }
    tracing::debug!(
        "Truncating article from {} to {} tokens",
        tokens.len(),
        max_tokens
    );
    tokens[..max_tokens].join(" ")
}
