pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// A multi-select argument: absent or `all` selects every value.
pub fn selection(arg: Option<&str>) -> Option<Vec<String>> {
    let values = split_csv(arg?);
    if values.iter().any(|v| v.eq_ignore_ascii_case("all")) {
        None
    } else {
        Some(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_filters() {
        let parts = split_csv(" alpha, ,beta,  gamma ");
        assert_eq!(parts, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn selection_defaults_to_everything() {
        assert_eq!(selection(None), None);
        assert_eq!(selection(Some("rps,ALL")), None);
    }

    #[test]
    fn selection_keeps_explicit_values() {
        assert_eq!(
            selection(Some("rps, creature")),
            Some(vec!["rps".to_string(), "creature".to_string()])
        );
        assert_eq!(selection(Some("")), Some(Vec::new()));
    }
}
