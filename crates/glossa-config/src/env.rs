use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Matches `{{ env.VAR }}` and `{{ env.VAR | default("fallback") }}`
///
/// Group 1 is the scoped key, group 2 the optional fallback.
fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*([a-zA-Z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#).expect("must be valid regex")
    })
}

/// Expand environment placeholders in raw TOML text
///
/// Runs before deserialization so config structs hold plain values.
/// Comment lines are copied through untouched, which keeps commented-out
/// secrets from requiring their variables.
pub fn expand_env(input: &str) -> Result<String, String> {
    let mut output = String::with_capacity(input.len());

    for line in input.split_inclusive('\n') {
        if line.trim_start().starts_with('#') {
            output.push_str(line);
        } else {
            output.push_str(&expand_line(line)?);
        }
    }

    Ok(output)
}

fn expand_line(line: &str) -> Result<String, String> {
    let mut expanded = String::with_capacity(line.len());
    let mut last_end = 0;

    for captures in placeholder().captures_iter(line) {
        let Some(whole) = captures.get(0) else {
            continue;
        };

        expanded.push_str(&line[last_end..whole.start()]);
        expanded.push_str(&resolve(&captures)?);
        last_end = whole.end();
    }

    expanded.push_str(&line[last_end..]);

    Ok(expanded)
}

fn resolve(captures: &Captures<'_>) -> Result<String, String> {
    let key = captures.get(1).map_or("", |m| m.as_str());
    let fallback = captures.get(2).map(|m| m.as_str());

    let Some(var_name) = key.strip_prefix("env.").filter(|name| !name.contains('.')) else {
        return Err(format!("only variables scoped with 'env.' are supported: `{key}`"));
    };

    match (std::env::var(var_name), fallback) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(fallback)) => Ok(fallback.to_owned()),
        (Err(_), None) => Err(format!("environment variable not found: `{var_name}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_without_placeholders_is_unchanged() {
        let input = "[translate]\ntimeout = \"30s\"\n";
        assert_eq!(expand_env(input).unwrap(), input);
    }

    #[test]
    fn trailing_newline_is_preserved() {
        temp_env::with_var("GLOSSA_ENV_A", Some("x"), || {
            assert_eq!(expand_env("a = \"{{ env.GLOSSA_ENV_A }}\"\n").unwrap(), "a = \"x\"\n");
            assert_eq!(expand_env("a = \"{{ env.GLOSSA_ENV_A }}\"").unwrap(), "a = \"x\"");
        });
    }

    #[test]
    fn several_placeholders_on_one_line() {
        let vars = [("GLOSSA_ENV_HOST", Some("example.com")), ("GLOSSA_ENV_PORT", Some("8443"))];
        temp_env::with_vars(vars, || {
            let result = expand_env("url = \"https://{{ env.GLOSSA_ENV_HOST }}:{{env.GLOSSA_ENV_PORT}}\"").unwrap();
            assert_eq!(result, "url = \"https://example.com:8443\"");
        });
    }

    #[test]
    fn missing_variable_is_an_error() {
        temp_env::with_var_unset("GLOSSA_ENV_MISSING", || {
            let err = expand_env("api_key = \"{{ env.GLOSSA_ENV_MISSING }}\"").unwrap_err();
            assert!(err.contains("GLOSSA_ENV_MISSING"));
        });
    }

    #[test]
    fn fallback_applies_only_when_unset() {
        temp_env::with_var_unset("GLOSSA_ENV_OPTIONAL", || {
            let result = expand_env("key = \"{{ env.GLOSSA_ENV_OPTIONAL | default(\"none\") }}\"").unwrap();
            assert_eq!(result, "key = \"none\"");
        });

        temp_env::with_var("GLOSSA_ENV_OPTIONAL", Some("set"), || {
            let result = expand_env("key = \"{{ env.GLOSSA_ENV_OPTIONAL | default(\"none\") }}\"").unwrap();
            assert_eq!(result, "key = \"set\"");
        });
    }

    #[test]
    fn non_env_scope_is_rejected() {
        let err = expand_env("key = \"{{ vault.TOKEN }}\"").unwrap_err();
        assert!(err.contains("only variables scoped with 'env.'"));
    }

    #[test]
    fn comment_lines_are_not_expanded() {
        temp_env::with_var_unset("GLOSSA_ENV_COMMENTED", || {
            let input = "  # master_key = \"{{ env.GLOSSA_ENV_COMMENTED }}\"\n";
            assert_eq!(expand_env(input).unwrap(), input);
        });
    }
}
