use research_data_services::ScoredDocument;

/// Completion text meaning "nothing here relates to US-listed ETFs".
pub const NO_RELEVANT_ETFS_SENTINEL: &str = "NO_RELEVANT_ETFS_FOUND";

/// Builds the ETF recommendation prompts for article and keyword subjects.
pub struct EtfPromptFormatter;

impl EtfPromptFormatter {
    /// Prompt for a news article, enriched with retrieved market commentary.
    pub fn format_article(article: &str, context: &[ScoredDocument], language: &str) -> String {
        let mut prompt = String::new();

        prompt.push_str(&format!("Here is the news article or text input: '{}'.\n\n", article));

        prompt.push_str("Additionally, here is relevant context about ETFs and market trends:\n");
        let rag_context = context
            .iter()
            .map(|doc| doc.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        prompt.push_str(&rag_context);
        prompt.push_str("\n\n");

        prompt.push_str(
            "Based on this input and the provided context, perform the following tasks:\n\n",
        );
        prompt.push_str(
            "1. Identify the most relevant industries, sectors, or trends that could impact the \
             U.S. stock markets (S&P 500, NASDAQ, Dow Jones). Focus on macro-level economic \
             impacts derived from the article. For example, an article about conflict in the \
             Middle East may affect not only the defense sector but also gold, energy, or the \
             broader U.S. market due to hedging movements.\n",
        );
        prompt.push_str(
            "2. For each identified industry or trend, list specific ETF tickers and their top 5 \
             holdings (stocks) that are directly related to these sectors. Ensure the ETFs you \
             suggest are relevant, established in U.S. markets, and very closely tied to the \
             article's context.\n",
        );
        prompt.push_str("3. Include at least one leveraged ETF (e.g., 2x or 3x) if applicable.\n\n");

        Self::push_output_format(&mut prompt, "the news article");
        Self::push_notes(&mut prompt, "the article has", "the input text", language);
        prompt.push_str("ONLY RETURN THE JSON OUTPUT.\n");

        prompt
    }

    /// Prompt for a list of search keywords. No retrieval context.
    pub fn format_keywords(keywords: &[String], language: &str) -> String {
        let mut prompt = String::new();

        prompt.push_str(&format!("Here is a list of keywords: '{}'.\n\n", keywords.join(", ")));
        prompt.push_str(
            "Based on these keywords and the relevant context of any keywords combinations, \
             perform the following tasks:\n\n",
        );
        prompt.push_str(
            "1. Identify the most relevant industries, sectors, or trends that could impact the \
             U.S. stock markets (S&P 500, NASDAQ, Dow Jones) related to these keywords.\n",
        );
        prompt.push_str(
            "2. For each identified industry or trend, list specific ETF tickers and their top 5 \
             holdings (stocks) that are directly related to these sectors. Ensure the ETFs you \
             suggest are relevant, established in U.S. markets, and very closely tied to the \
             keywords.\n",
        );
        prompt.push_str("3. Include at least one leveraged ETF (e.g., 2x or 3x) if applicable.\n\n");

        Self::push_output_format(&mut prompt, "the keywords");
        Self::push_notes(&mut prompt, "the keywords have", "the keywords", language);
        prompt.push_str("- Preferably, recommend more than 1 ETF.\n\n");
        prompt.push_str(
            "YOU MUST ONLY RETURN THE JSON OUTPUT. NO OTHER TEXT OR EXPLANATIONS ARE ACCEPTED.\n",
        );

        prompt
    }

    fn push_output_format(prompt: &mut String, subject: &str) {
        prompt.push_str("Return the response strictly and only in the following JSON format:\n\n");
        prompt.push_str("{\n");
        prompt.push_str("    \"ticker\": \"<ETF Ticker>\",\n");
        prompt.push_str(
            "    \"top5\": [\"<Top 1 stock>\", \"<Top 2 stock>\", \"<Top 3 stock>\", \
             \"<Top 4 stock>\", \"<Top 5 stock>\"],\n",
        );
        prompt.push_str(&format!(
            "    \"explanation\": \"<Detailed explanation of how this ETF relates to {}, \
             including its relation to the identified trend or industry, and a brief \
             description of the ETF itself>\",\n",
            subject
        ));
        prompt.push_str(
            "    \"holdings_weight\": \"<The weight of each stock in the ETF holdings>\",\n",
        );
        prompt.push_str("    \"expense_ratio\": \"<The expense ratio of the ETF>\"\n");
        prompt.push_str("}\n\n");
    }

    fn push_notes(prompt: &mut String, subject_has: &str, relation_target: &str, language: &str) {
        prompt.push_str("Important notes:\n\n");
        prompt.push_str(&format!(
            "- If {} absolutely no relevance to U.S. stock market-listed ETFs, return the \
             response: {}\n",
            subject_has, NO_RELEVANT_ETFS_SENTINEL
        ));
        prompt.push_str(&format!(
            "- The entire response must be written in {} with a professional, expert tone.\n",
            language
        ));
        prompt.push_str(&format!(
            "- Ensure that the explanations fully describe the relationship between the \
             inferred ETFs and {}.\n",
            relation_target
        ));
        prompt.push_str(
            "- Include a detailed description of each ETF, focusing on how the ETF is impacted \
             by the identified trend or industry.\n",
        );
        prompt.push_str(
            "- Make sure that the recommended ETFs are ones an investor would actually buy, \
             not just general market or sector funds.\n",
        );
        prompt.push_str(
            "- Make sure that the recommended ETFs and their justifications are acceptable to \
             a professional investor.\n",
        );
        prompt.push_str("\nStrictly follow the syntax and instructions provided.\n");
    }
}
