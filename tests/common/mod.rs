//! Shared helpers for tplc integration tests.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::Path;

pub use tplc::test_utils::TestProject;

/// A `tplc` command running inside `dir` with a fixed environment.
pub fn tplc_in(dir: &Path) -> Command {
    tplc::test_utils::init_test_logging(None);
    tracing::debug!("running tplc in {}", dir.display());

    let mut cmd = Command::cargo_bin("tplc").unwrap();
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

/// Lay out the small site used by most render tests.
///
/// ```text
/// _layout.tpl        base layout with a `body` block
/// first.tpl          extends the layout, prints its slug and site name
/// second.tpl         plain page that reads `name`
/// third/third.tpl    front matter sets `name` to "mars"
/// data.json          {"site": {"name": "Planets"}, "name": "world"}
/// ```
pub fn site_project() -> TestProject {
    let project = TestProject::new().unwrap();
    project
        .write_file(
            "_layout.tpl",
            "<title>{{ site.name }}</title>\n<main>{% block body %}{% endblock %}</main>\n",
        )
        .unwrap();
    project
        .write_file(
            "first.tpl",
            "{% extends \"_layout.tpl\" %}{% block body %}{{ slug }} of {{ site.name }}{% endblock %}",
        )
        .unwrap();
    project.write_file("second.tpl", "hello {{ name }}!\n").unwrap();
    project
        .write_file(
            "third/third.tpl",
            "{% frontmatter %}\n{ \"name\": \"mars\" }\n{% endfrontmatter %}\nhello {{ name }}!\n",
        )
        .unwrap();
    project
        .write_file("data.json", r#"{"site": {"name": "Planets"}, "name": "world"}"#)
        .unwrap();
    project
}
