//! Cross-Cluster-Search Index Patterns

/// Expand a base index pattern with cross-cluster-search qualifiers.
///
/// Each comma-separated part of the base pattern gets one `remote:part`
/// copy per remote, appended after the original. An empty remote list
/// leaves the pattern untouched.
pub fn ccs_index_pattern(base: &str, remotes: &[String]) -> String {
    if remotes.is_empty() {
        return base.to_string();
    }
    let prefixed = base
        .split(',')
        .map(|part| {
            remotes
                .iter()
                .map(|remote| format!("{}:{}", remote, part))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join(",");
    format!("{},{}", base, prefixed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_remotes_is_identity() {
        assert_eq!(ccs_index_pattern(".monitoring-alerts-*", &[]), ".monitoring-alerts-*");
    }

    #[test]
    fn test_single_remote() {
        let remotes = vec!["eu".to_string()];
        assert_eq!(
            ccs_index_pattern(".monitoring-alerts-*", &remotes),
            ".monitoring-alerts-*,eu:.monitoring-alerts-*"
        );
    }

    #[test]
    fn test_multiple_remotes_and_parts() {
        let remotes = vec!["eu".to_string(), "us".to_string()];
        assert_eq!(
            ccs_index_pattern("alerts-a,alerts-b", &remotes),
            "alerts-a,alerts-b,eu:alerts-a,us:alerts-a,eu:alerts-b,us:alerts-b"
        );
    }
}
