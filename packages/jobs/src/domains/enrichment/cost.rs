//! Token cost accounting for classification runs.

use std::ops::AddAssign;

use anyhow::Result;
use openai_client::Usage;
use tiktoken_rs::CoreBPE;
use tracing::warn;

/// USD per million tokens: (model prefix, input, output).
///
/// Matched by longest prefix so dated snapshots such as
/// `gpt-4o-mini-2024-07-18` resolve to their family.
const PRICING: &[(&str, f64, f64)] = &[
    ("gpt-4o-mini", 0.15, 0.60),
    ("gpt-4o", 2.50, 10.00),
    ("gpt-4.1-nano", 0.10, 0.40),
    ("gpt-4.1-mini", 0.40, 1.60),
    ("gpt-4.1", 2.00, 8.00),
    ("gpt-5-nano", 0.05, 0.40),
    ("gpt-5-mini", 0.25, 2.00),
    ("gpt-5", 1.25, 10.00),
];

const PER_TOKENS: f64 = 1_000_000.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Cost {
    pub input_cost: f64,
    pub output_cost: f64,
    pub total_cost: f64,
}

impl AddAssign for Cost {
    fn add_assign(&mut self, other: Self) {
        self.input_cost += other.input_cost;
        self.output_cost += other.output_cost;
        self.total_cost += other.total_cost;
    }
}

fn pricing_for(model: &str) -> Option<(f64, f64)> {
    PRICING
        .iter()
        .filter(|(prefix, _, _)| model.starts_with(prefix))
        .max_by_key(|(prefix, _, _)| prefix.len())
        .map(|(_, input, output)| (*input, *output))
}

/// Dollar cost of a call. Models missing from the price table cost zero.
pub fn calculate_cost(model: &str, input_tokens: u64, output_tokens: u64) -> Cost {
    let Some((input_price, output_price)) = pricing_for(model) else {
        warn!(model, "No pricing for model; reporting zero cost");
        return Cost::default();
    };

    let input_cost = input_tokens as f64 * input_price / PER_TOKENS;
    let output_cost = output_tokens as f64 * output_price / PER_TOKENS;

    Cost {
        input_cost,
        output_cost,
        total_cost: input_cost + output_cost,
    }
}

/// Tokenizer for `model`. Models tiktoken has no mapping for use `o200k_base`,
/// the encoding of the gpt-4o and later families.
fn tokenizer_for(model: &str) -> Result<CoreBPE> {
    tiktoken_rs::get_bpe_from_model(model).or_else(|_| tiktoken_rs::o200k_base())
}

/// Token count of each text under `model`'s encoding, computed locally
/// before any request is made.
pub fn count_tokens_per_text<S: AsRef<str>>(model: &str, texts: &[S]) -> Result<Vec<usize>> {
    let bpe = tokenizer_for(model)?;
    Ok(texts
        .iter()
        .map(|text| bpe.encode_with_special_tokens(text.as_ref()).len())
        .collect())
}

/// Running token totals across many calls to one model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenTally {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub calls_without_usage: usize,
}

impl TokenTally {
    pub fn record(&mut self, usage: Option<Usage>) {
        match usage {
            Some(usage) => {
                self.input_tokens += u64::from(usage.prompt_tokens);
                self.output_tokens += u64::from(usage.completion_tokens);
            }
            None => self.calls_without_usage += 1,
        }
    }

    pub fn cost(&self, model: &str) -> Cost {
        calculate_cost(model, self.input_tokens, self.output_tokens)
    }
}
