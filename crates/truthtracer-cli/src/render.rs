use console::{style, Emoji, StyledObject, Term};
use truthtracer_schema::{confidence_percent, Facet, FactResult, Socratic, TrustChain, Verdict};

pub static CHECKMARK: Emoji<'_, '_> = Emoji("✅ ", "√ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "x ");
pub static ARROW: Emoji<'_, '_> = Emoji("➜  ", "-> ");
pub static LOUPE: Emoji<'_, '_> = Emoji("🔎 ", "");

const NO_EXPLANATION: &str = "No explanation available";
const NO_QUESTION: &str = "No question available";
const NO_ANALYSIS: &str = "No analysis available";
const NO_EVIDENCE: &str = "No evidence available";
const NO_IMPLICATIONS: &str = "No implications available";
const NO_VALIDITY: &str = "No validity assessment available";
const NO_RECOMMENDATIONS: &str = "No recommendations available";
const UNKNOWN_SOURCE: &str = "Unknown source";
const UNKNOWN_DATE: &str = "Unknown";

pub fn verdict_style(verdict: Verdict) -> StyledObject<&'static str> {
    let label = style(verdict.as_str()).bold();
    match verdict {
        Verdict::True => label.green(),
        Verdict::False => label.red(),
        Verdict::Misleading => label.yellow(),
        Verdict::Unverified => label.dim(),
    }
}

fn or_placeholder<'a>(value: Option<&'a str>, placeholder: &'a str) -> &'a str {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(placeholder)
}

pub fn format_date(result: &FactResult) -> String {
    result
        .saved_at()
        .map(|ts| ts.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| UNKNOWN_DATE.to_string())
}

/// "1 item" / "N items".
pub fn count_label(count: usize) -> String {
    if count == 1 {
        "1 item".to_string()
    } else {
        format!("{count} items")
    }
}

/// Full text rendering of one analysed claim.
pub fn render_result(result: &FactResult) -> String {
    let mut lines = Vec::new();

    lines.push(format!("{}", style(result.claim_text()).bold()));
    let mut headline = format!("{}", verdict_style(result.verdict()));
    if let Some(confidence) = result.trust_chain.as_ref().and_then(|tc| tc.confidence) {
        headline.push_str(&format!("  {}% confidence", confidence_percent(confidence)));
    }
    lines.push(headline);
    lines.push(format!("Analyzed: {}", format_date(result)));
    if let Some(id) = &result.id {
        lines.push(format!("Id: {id}"));
    }

    lines.push(String::new());
    render_fact_check(result, &mut lines);
    lines.push(String::new());
    render_trust_chain(result, &mut lines);
    lines.push(String::new());
    render_socratic(result, &mut lines);
    lines.push(String::new());
    render_status(result, &mut lines);

    lines.join("\n")
}

fn section(lines: &mut Vec<String>, title: &str) {
    lines.push(format!("{}", style(title).bold().cyan()));
}

fn unavailable(lines: &mut Vec<String>, facet: Facet) {
    lines.push(format!("  {}", style(format!("{} unavailable", facet.label())).dim()));
}

fn render_fact_check(result: &FactResult, lines: &mut Vec<String>) {
    section(lines, "Fact Check");
    let Some(fact_check) = result
        .fact_check
        .as_ref()
        .filter(|_| result.facet_fulfilled(Facet::FactCheck))
    else {
        unavailable(lines, Facet::FactCheck);
        return;
    };
    lines.push(format!(
        "  {}",
        or_placeholder(fact_check.explanation.as_deref(), NO_EXPLANATION)
    ));
    if fact_check.sources.is_empty() {
        return;
    }
    lines.push("  Sources:".to_string());
    for source in &fact_check.sources {
        let mut line = format!(
            "   - {}",
            or_placeholder(source.title.as_deref(), UNKNOWN_SOURCE)
        );
        if let Some(url) = source.url.as_deref().filter(|u| !u.is_empty()) {
            line.push_str(&format!(" <{url}>"));
        }
        if let Some(reliability) = source.reliability.as_deref().filter(|r| !r.is_empty()) {
            line.push_str(&format!(" [{reliability}]"));
        }
        lines.push(line);
    }
}

fn render_trust_chain(result: &FactResult, lines: &mut Vec<String>) {
    section(lines, "Trust Chain");
    let Some(trust_chain) = result
        .trust_chain
        .as_ref()
        .filter(|_| result.facet_fulfilled(Facet::TrustChain))
    else {
        unavailable(lines, Facet::TrustChain);
        return;
    };
    let TrustChain {
        has_trust_chain,
        confidence,
        explanation,
        context,
        gaps,
        sources,
    } = trust_chain;

    if let Some(confidence) = *confidence {
        lines.push(format!("  Confidence: {}%", confidence_percent(confidence)));
    }
    if *has_trust_chain == Some(false) {
        lines.push("  No verifiable trust chain found".to_string());
    }
    lines.push(format!(
        "  {}",
        or_placeholder(explanation.as_deref(), NO_EXPLANATION)
    ));
    if let Some(context) = context.as_deref().filter(|c| !c.trim().is_empty()) {
        lines.push(format!("  Context: {context}"));
    }
    if !gaps.is_empty() {
        lines.push("  Gaps:".to_string());
        lines.extend(gaps.iter().map(|gap| format!("   - {gap}")));
    }
    if !sources.is_empty() {
        lines.push("  Sources:".to_string());
        for source in sources {
            let mut line = format!(
                "   - {}",
                or_placeholder(source.name.as_deref(), UNKNOWN_SOURCE)
            );
            if let Some(url) = source.url.as_deref().filter(|u| !u.is_empty()) {
                line.push_str(&format!(" <{url}>"));
            }
            if let Some(reliability) = source.reliability {
                line.push_str(&format!(" [{}%]", confidence_percent(reliability)));
            }
            lines.push(line);
        }
    }
}

fn render_socratic(result: &FactResult, lines: &mut Vec<String>) {
    section(lines, "Socratic Analysis");
    let Some(Socratic {
        reasoning_steps,
        conclusion,
    }) = result
        .socratic
        .as_ref()
        .filter(|_| result.facet_fulfilled(Facet::Socratic))
    else {
        unavailable(lines, Facet::Socratic);
        return;
    };

    for (index, step) in reasoning_steps.iter().enumerate() {
        lines.push(format!(
            "  {}. {}",
            index + 1,
            or_placeholder(step.question.as_deref(), NO_QUESTION)
        ));
        lines.push(format!(
            "     Analysis: {}",
            or_placeholder(step.analysis.as_deref(), NO_ANALYSIS)
        ));
        lines.push(format!(
            "     Evidence: {}",
            or_placeholder(step.evidence.as_deref(), NO_EVIDENCE)
        ));
        lines.push(format!(
            "     Implications: {}",
            or_placeholder(step.implications.as_deref(), NO_IMPLICATIONS)
        ));
    }

    let conclusion = conclusion.clone().unwrap_or_default();
    lines.push(format!(
        "  Logical Validity: {}",
        or_placeholder(conclusion.logical_validity.as_deref(), NO_VALIDITY)
    ));
    if !conclusion.key_flaws.is_empty() {
        lines.push("  Key Flaws:".to_string());
        lines.extend(conclusion.key_flaws.iter().map(|f| format!("   - {f}")));
    }
    if !conclusion.strengths.is_empty() {
        lines.push("  Strengths:".to_string());
        lines.extend(conclusion.strengths.iter().map(|s| format!("   - {s}")));
    }
    lines.push(format!(
        "  Recommendations: {}",
        or_placeholder(conclusion.recommendations.as_deref(), NO_RECOMMENDATIONS)
    ));
}

fn render_status(result: &FactResult, lines: &mut Vec<String>) {
    section(lines, "Analysis Status");
    for facet in Facet::ALL {
        let marker = if result.facet_fulfilled(facet) {
            CHECKMARK
        } else {
            CROSS
        };
        lines.push(format!(
            "  {}{}: {}",
            marker,
            facet.label(),
            result.facet_status(facet).unwrap_or("pending")
        ));
    }
}

/// History panel: one row per saved result, newest first.
pub fn render_history(results: &[FactResult]) -> String {
    if results.is_empty() {
        return format!("{}", style("No history yet").dim());
    }
    let mut lines = vec![format!("{}", style(count_label(results.len())).bold())];
    for result in results {
        lines.push(format!(
            "{}  {}  {}  {}",
            style(result.id.as_deref().unwrap_or("-")).cyan(),
            format_date(result),
            verdict_style(result.verdict()),
            result.claim_text()
        ));
    }
    lines.join("\n")
}

pub fn print_block(term: &Term, text: &str) {
    let _ = term.write_line(text);
}

pub fn print_done(term: &Term, msg: &str) {
    let _ = term.write_line(&format!("{} {}", CHECKMARK, style(msg).green()));
}

pub fn print_error(term: &Term, msg: &str, hint: &str) {
    let _ = term.write_line(&format!("{} {}", CROSS, style(msg).red().bold()));
    let _ = term.write_line(&format!("{} {}", ARROW, style(hint).dim()));
}
