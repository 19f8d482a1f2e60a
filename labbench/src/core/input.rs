//! Builds the stdin payload a lab script reads: an element count on the
//! first line, then one numeric value per line.
//!
//! Two modes. Plain mode parses the user's own numbers (comma or whitespace
//! separated). Random mode triggers on the word `random` anywhere in the
//! text and reads a 3-field `count,min,max` spec, emitting `count` uniform
//! integers in `[min, max]` inclusive.

use anyhow::{Result, anyhow, bail};
use rand::Rng;

const RANDOM_TOKEN: &str = "random";

/// Upper bound on random-mode element counts. Keeps a typo like
/// `random 9000000000,1,10` from materializing a multi-GB payload.
pub const MAX_RANDOM_COUNT: i64 = 1_000_000;

/// Build a payload from raw user text using the thread-local RNG.
///
/// Returns `Ok("")` when plain-mode parsing fails (the whole input is
/// rejected rather than partially processed). Returns `Err` only for an
/// invalid random-mode spec; callers render that as a validation message.
pub fn build_payload(raw: &str) -> Result<String> {
    build_payload_with_rng(raw, &mut rand::thread_rng())
}

/// Same as [`build_payload`] with an injected RNG for deterministic tests.
pub fn build_payload_with_rng<R: Rng + ?Sized>(raw: &str, rng: &mut R) -> Result<String> {
    if raw.to_ascii_lowercase().contains(RANDOM_TOKEN) {
        let spec = strip_random_token(raw);
        let fields: Vec<&str> = spec.split(',').collect();
        if fields.len() == 3 {
            return random_payload(&fields, rng);
        }
        // Wrong field count: fall through to plain parsing of the original
        // text (which still contains the trigger word and so rejects).
    }
    plain_payload(raw)
}

/// Remove every case-insensitive occurrence of the trigger word so the
/// remaining text is a plain `count,min,max` field list.
fn strip_random_token(raw: &str) -> String {
    let lower = raw.to_ascii_lowercase();
    let mut out = String::with_capacity(raw.len());
    let mut rest = 0;
    for (idx, _) in lower.match_indices(RANDOM_TOKEN) {
        out.push_str(&raw[rest..idx]);
        rest = idx + RANDOM_TOKEN.len();
    }
    out.push_str(&raw[rest..]);
    out
}

fn random_payload<R: Rng + ?Sized>(fields: &[&str], rng: &mut R) -> Result<String> {
    let count = int_field(fields[0], "count")?;
    let min = int_field(fields[1], "min")?;
    let max = int_field(fields[2], "max")?;
    if count < 0 {
        bail!("count must be non-negative, got {count}");
    }
    if count > MAX_RANDOM_COUNT {
        bail!("count {count} exceeds the {MAX_RANDOM_COUNT} element limit");
    }
    if min > max {
        bail!("min {min} exceeds max {max}");
    }
    let mut payload = format!("{count}\n");
    for _ in 0..count {
        let value: i64 = rng.gen_range(min..=max);
        payload.push_str(&value.to_string());
        payload.push('\n');
    }
    Ok(payload)
}

/// Float-tolerant integer conversion: `"4.8"` parses and truncates to `4`.
fn int_field(field: &str, name: &str) -> Result<i64> {
    let trimmed = field.trim();
    let parsed: f64 = trimmed
        .parse()
        .map_err(|_| anyhow!("invalid {name} field {trimmed:?}: expected a number"))?;
    if !parsed.is_finite() {
        bail!("invalid {name} field {trimmed:?}: expected a finite number");
    }
    Ok(parsed.trunc() as i64)
}

fn plain_payload(raw: &str) -> Result<String> {
    let mut values = Vec::new();
    for token in raw.replace(',', " ").split_whitespace() {
        match token.parse::<f64>() {
            Ok(value) => values.push(value),
            // One bad token rejects the whole input; never emit a partial
            // payload the script would misread against the count prefix.
            Err(_) => return Ok(String::new()),
        }
    }
    let mut payload = format!("{}\n", values.len());
    for value in values {
        payload.push_str(&value.to_string());
        payload.push('\n');
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn plain_values_are_count_prefixed_in_order() {
        let payload = build_payload("1, 2.5 3").expect("payload");
        assert_eq!(payload, "3\n1\n2.5\n3\n");
    }

    #[test]
    fn empty_input_is_a_zero_count_payload() {
        assert_eq!(build_payload("").expect("payload"), "0\n");
        assert_eq!(build_payload("  \n ").expect("payload"), "0\n");
    }

    #[test]
    fn one_bad_token_rejects_the_whole_input() {
        assert_eq!(build_payload("1, x, 3").expect("payload"), "");
    }

    #[test]
    fn random_spec_emits_count_values_within_bounds() {
        let payload = build_payload_with_rng("random 4, 1, 10", &mut rng()).expect("payload");
        let lines: Vec<&str> = payload.lines().collect();
        assert_eq!(lines[0], "4");
        assert_eq!(lines.len(), 5);
        for line in &lines[1..] {
            let value: i64 = line.parse().expect("integer line");
            assert!((1..=10).contains(&value), "value {value} out of bounds");
        }
        assert!(payload.ends_with('\n'));
    }

    #[test]
    fn random_payload_is_deterministic_under_a_seeded_rng() {
        let first = build_payload_with_rng("random 8, -5, 5", &mut rng()).expect("payload");
        let second = build_payload_with_rng("random 8, -5, 5", &mut rng()).expect("payload");
        assert_eq!(first, second);
    }

    #[test]
    fn random_trigger_is_case_insensitive() {
        let payload = build_payload_with_rng("RanDom 2, 3, 3", &mut rng()).expect("payload");
        assert_eq!(payload, "2\n3\n3\n");
    }

    #[test]
    fn random_fields_tolerate_floats_by_truncation() {
        let payload = build_payload_with_rng("random 2.9, 3.7, 3.2", &mut rng()).expect("payload");
        // count 2, bounds [3, 3]
        assert_eq!(payload, "2\n3\n3\n");
    }

    #[test]
    fn random_zero_count_is_valid() {
        let payload = build_payload_with_rng("random 0, 1, 2", &mut rng()).expect("payload");
        assert_eq!(payload, "0\n");
    }

    #[test]
    fn random_with_wrong_field_count_falls_through_to_plain_parsing() {
        // Original text still contains the trigger word, so plain parsing
        // rejects it and the payload degrades to empty.
        assert_eq!(
            build_payload_with_rng("random,1,2,3", &mut rng()).expect("payload"),
            ""
        );
    }

    #[test]
    fn random_with_bad_field_is_a_validation_error() {
        let err = build_payload_with_rng("random x, 1, 10", &mut rng()).expect_err("must fail");
        assert!(err.to_string().contains("count"), "got: {err}");
    }

    #[test]
    fn random_with_negative_count_is_a_validation_error() {
        let err = build_payload_with_rng("random -3, 1, 10", &mut rng()).expect_err("must fail");
        assert!(err.to_string().contains("non-negative"), "got: {err}");
    }

    #[test]
    fn random_with_an_oversized_count_is_a_validation_error() {
        let err =
            build_payload_with_rng("random 9000000000, 1, 10", &mut rng()).expect_err("must fail");
        assert!(err.to_string().contains("element limit"), "got: {err}");
    }

    #[test]
    fn random_with_inverted_bounds_is_a_validation_error() {
        let err = build_payload_with_rng("random 3, 10, 1", &mut rng()).expect_err("must fail");
        assert!(err.to_string().contains("exceeds"), "got: {err}");
    }
}
