//! Normalization of free-text ingredient lines into quantity, unit and name.

use crate::error::FetchError;
use crate::recipe::IngredientLine;

/// Long unit spellings and the short form they are folded into.
const UNIT_ALIASES: &[(&str, &str)] = &[
    ("tablespoons", "tbsp"),
    ("tablespoon", "tbsp"),
    ("ounces", "oz"),
    ("ounce", "oz"),
    ("teaspoons", "tsp"),
    ("teaspoon", "tsp"),
    ("cups", "cup"),
    ("pounds", "pound"),
];

/// Units recognised after folding.
const UNITS: &[&str] = &["tbsp", "oz", "tsp", "cup", "pound", "kg", "g"];

/// Parse one ingredient line as the provider writes it, e.g.
/// `"1 1/2 cups (12 ounces) whole milk"`.
pub fn parse_ingredient(line: &str) -> Result<IngredientLine, FetchError> {
    let lowered = strip_parenthesized(&line.to_lowercase());
    let tokens: Vec<&str> = lowered.split_whitespace().map(fold_unit).collect();

    if let Some(unit_index) = tokens.iter().position(|t| UNITS.contains(t)) {
        let count_tokens = &tokens[..unit_index];
        let quantity = if count_tokens.is_empty() {
            None
        } else {
            let mut total = 0.0;
            for token in count_tokens {
                total += parse_quantity(token)
                    .ok_or_else(|| FetchError::Parse(format!("bad quantity in {line:?}")))?;
            }
            Some(total)
        };
        return Ok(IngredientLine::new(
            quantity,
            Some(tokens[unit_index]),
            tokens[unit_index + 1..].join(" "),
        ));
    }

    if let Some(count) = tokens
        .first()
        .and_then(|t| parse_quantity(t))
        .filter(|c| *c > 0.0)
    {
        return Ok(IngredientLine::new(Some(count), None, tokens[1..].join(" ")));
    }

    Ok(IngredientLine::new(None, None, tokens.join(" ")))
}

fn fold_unit(token: &str) -> &str {
    UNIT_ALIASES
        .iter()
        .find(|(long, _)| *long == token)
        .map(|(_, short)| *short)
        .unwrap_or(token)
}

/// Drop `( ... )` asides. An unclosed `(` swallows the rest of the line.
fn strip_parenthesized(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '(' => {
                depth += 1;
                out.push(' ');
            }
            ')' if depth > 0 => depth -= 1,
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

/// `"2"`, `"1/2"` and `"1-1/2"` (one and a half).
fn parse_quantity(token: &str) -> Option<f64> {
    let mut total = 0.0;
    for part in token.split('-') {
        total += parse_number(part)?;
    }
    Some(total)
}

fn parse_number(part: &str) -> Option<f64> {
    let value = match part.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.parse().ok()?;
            let den: f64 = den.parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => part.parse().ok()?,
    };
    value.is_finite().then_some(value)
}
