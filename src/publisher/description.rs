//! Release body rendering.

use super::error::Result;
use crate::plugin::CommitInfo;
use handlebars::Handlebars;
use serde::Serialize;

const TEMPLATE: &str = "{{message}}
[{{sha}}]({{html_url}}) ([browse tree]({{tree_url}}))

**Hashes**:

Debug:

{{debug.name}}: {{debug.sha256}}

Release:

{{release.name}}: {{release.sha256}}
{{#if extras}}

Extras:

{{#each extras}}
{{this.name}}: {{this.sha256}}
{{/each}}
{{/if}}
";

/// A file name with its digest, as listed in the body.
#[derive(Clone, Debug, Serialize)]
pub struct HashLine {
    pub name: String,
    pub sha256: String,
}

#[derive(Serialize)]
struct Context<'a> {
    message: &'a str,
    sha: &'a str,
    html_url: &'a str,
    tree_url: String,
    debug: &'a HashLine,
    release: &'a HashLine,
    extras: &'a [HashLine],
}

/// Markdown body for a release built from `commit`.
pub fn render(
    commit: &CommitInfo,
    debug: &HashLine,
    release: &HashLine,
    extras: &[HashLine],
) -> Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);

    let context = Context {
        message: commit.commit.message.trim(),
        sha: &commit.sha,
        html_url: &commit.html_url,
        tree_url: commit.tree_url(),
        debug,
        release,
        extras,
    };
    Ok(handlebars.render_template(TEMPLATE, &context)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit() -> CommitInfo {
        serde_json::from_str(
            r#"{"sha": "abc1234def", "html_url": "https://github.com/acme/Foo/commit/abc1234def",
                "commit": {"message": "  Fix <panic> & more\n\n", "committer": {"date": "2024-01-01T00:00:00Z"}}}"#,
        )
        .unwrap()
    }

    fn line(name: &str, sha: &str) -> HashLine {
        HashLine { name: name.into(), sha256: sha.into() }
    }

    #[test]
    fn lists_commit_links_and_hashes() {
        let body = render(
            &commit(),
            &line("Foo.kext", "d1"),
            &line("Foo.kext", "r1"),
            &[],
        )
        .unwrap();

        assert!(body.starts_with("Fix <panic> & more\n"));
        assert!(body.contains(
            "[abc1234def](https://github.com/acme/Foo/commit/abc1234def) \
             ([browse tree](https://github.com/acme/Foo/tree/abc1234def))"
        ));
        assert!(body.contains("Debug:\n\nFoo.kext: d1"));
        assert!(body.contains("Release:\n\nFoo.kext: r1"));
        assert!(!body.contains("Extras:"));
    }

    #[test]
    fn extras_section_lists_each_file() {
        let body = render(
            &commit(),
            &line("Foo.kext", "d1"),
            &line("Foo.kext", "r1"),
            &[line("Foo.dSYM", "e1"), line("README.md", "e2")],
        )
        .unwrap();

        assert!(body.contains("Extras:"));
        assert!(body.contains("Foo.dSYM: e1"));
        assert!(body.contains("README.md: e2"));
    }
}
