//! Roadmap text segmentation

/// Split roadmap text into its non-empty, trimmed lines, in order
pub fn segment(raw_text: &str) -> Vec<String> {
    raw_text
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_drops_blank_lines() {
        assert!(segment("").is_empty());
        assert!(segment("\n \n\t\n").is_empty());
        assert_eq!(segment("a\n\nb\n  \nc"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_segment_trims_and_keeps_order() {
        let text = "  1. Learn syntax  \r\n2. Build a CLI\n\n   3. Ship it";
        assert_eq!(
            segment(text),
            vec!["1. Learn syntax", "2. Build a CLI", "3. Ship it"]
        );
    }

    #[test]
    fn test_segment_is_idempotent() {
        let inputs = [
            "",
            "a\n\nb\n  \nc",
            "  Step one \n\n\tStep two\r\n \n Step three  ",
            "single",
        ];
        for input in inputs {
            let once = segment(input);
            let twice = segment(&once.join("\n"));
            assert_eq!(once, twice, "input {:?}", input);
        }
    }
}
