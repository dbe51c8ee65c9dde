use std::collections::HashMap;

/// Keeps `ln` finite without noticeably shifting realistic scores.
const ENTROPY_EPSILON: f64 = 1e-9;

/// Shannon-style diversity of the pooled, lower-cased, whitespace-split
/// vocabulary of `texts`. 0.0 when there are no words at all.
pub fn topic_entropy<S: AsRef<str>>(texts: &[S]) -> f64 {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut total = 0usize;
    for text in texts {
        for word in text.as_ref().split_whitespace() {
            *counts.entry(word.to_lowercase()).or_default() += 1;
            total += 1;
        }
    }
    if total == 0 {
        return 0.0;
    }

    let total = total as f64;
    counts
        .values()
        .map(|&c| {
            let p = c as f64 / total;
            -p * (p + ENTROPY_EPSILON).ln()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entropy_empty() {
        assert_eq!(topic_entropy::<&str>(&[]), 0.0);
        assert_eq!(topic_entropy(&["", "   \n"]), 0.0);
    }

    #[test]
    fn test_entropy_single_word_near_zero() {
        let few = topic_entropy(&["spam spam"]);
        let many = topic_entropy(&["spam ".repeat(1000)]);
        assert!(few.abs() < 1e-6);
        assert!(many.abs() < 1e-6);
    }

    #[test]
    fn test_entropy_uniform_vocabulary() {
        let e = topic_entropy(&["a b", "c d"]);
        assert!((e - 4f64.ln()).abs() < 1e-6);
    }

    #[test]
    fn test_entropy_case_insensitive_and_pooled() {
        let pooled = topic_entropy(&["Breaking NEWS", "breaking news"]);
        let single = topic_entropy(&["breaking news breaking news"]);
        assert!((pooled - single).abs() < 1e-12);
        assert!((pooled - 2f64.ln()).abs() < 1e-6);
    }

    #[test]
    fn test_entropy_non_negative() {
        let e = topic_entropy(&["the the the cat", "sat on the mat"]);
        assert!(e > 0.0);
    }
}
