//! End-to-end tests for `tplc render`.

use predicates::prelude::*;

use crate::common::{TestProject, site_project, tplc_in};

#[test]
fn test_layout_data_and_slug() {
    let project = site_project();

    tplc_in(project.path())
        .args(["render", "first.tpl", "--data", "data.json", "--partial", "_layout.tpl", "--no-env"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<title>Planets</title>"))
        .stdout(predicate::str::contains("<main>first-tpl of Planets</main>"));
}

#[test]
fn test_front_matter_overrides_data_for_its_file_only() {
    let project = site_project();

    tplc_in(project.path())
        .args(["render", "third/third.tpl", "--data", "data.json", "--no-env"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hello mars!"))
        .stdout(predicate::str::contains("frontmatter").not());

    tplc_in(project.path())
        .args(["render", "second.tpl", "--data", "data.json", "--no-env"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hello world!"));
}

#[test]
fn test_several_templates_share_one_run() {
    let project = site_project();

    tplc_in(project.path())
        .args(["render", "third/third.tpl", "second.tpl", "--data", "data.json", "--no-env"])
        .assert()
        .success()
        .stdout("hello mars!\nhello world!\n");
}

#[test]
fn test_several_templates_to_one_output_file() {
    let project = site_project();

    tplc_in(project.path())
        .args([
            "render",
            "second.tpl",
            "first.tpl",
            "--partial",
            "_layout.tpl",
            "--data",
            "data.json",
            "--output",
            "out/all.html",
            "--no-env",
        ])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = project.read_file("out/all.html").unwrap();
    assert!(written.starts_with("hello world!\n<title>Planets</title>"));
    assert!(written.contains("<main>first-tpl of Planets</main>"));
}

#[test]
fn test_template_given_twice_is_rejected() {
    let project = site_project();

    tplc_in(project.path())
        .args(["render", "second.tpl", "--partial", "second.tpl", "--no-env"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'second.tpl' is given both as a template and a partial"));
}

#[test]
fn test_layout_front_matter_reaches_page() {
    let project = TestProject::new().unwrap();
    project
        .write_file(
            "_layout.tpl",
            "{% frontmatter %}{\"site\": \"Mars\", \"lang\": \"en\"}{% endfrontmatter %}\
             <h1>{{ site }}/{{ lang }}</h1>{% block body %}{% endblock %}",
        )
        .unwrap();
    project
        .write_file(
            "page.tpl",
            "{% extends \"_layout.tpl\" %}\
             {% frontmatter %}{\"lang\": \"fr\"}{% endfrontmatter %}\
             {% block body %}!{% endblock %}",
        )
        .unwrap();

    tplc_in(project.path())
        .args(["render", "page.tpl", "--partial", "_layout.tpl", "--no-env"])
        .assert()
        .success()
        .stdout("<h1>Mars/fr</h1>!");
}

#[test]
fn test_invalid_front_matter_in_partial_names_the_partial() {
    let project = TestProject::new().unwrap();
    project.write_file("page.tpl", "{% include \"_nav.tpl\" %}").unwrap();
    project
        .write_file("_nav.tpl", "{% frontmatter %}{ not json }{% endfrontmatter %}<nav/>")
        .unwrap();

    tplc_in(project.path())
        .args(["render", "page.tpl", "--partial", "_nav.tpl", "--no-env"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid front matter in _nav.tpl"));
}

#[test]
fn test_environment_exposed_under_env() {
    let project = TestProject::new().unwrap();
    project.write_file("env.tpl", "planet={{ env.TPLC_TEST_PLANET }}").unwrap();

    tplc_in(project.path())
        .env("TPLC_TEST_PLANET", "jupiter")
        .args(["render", "env.tpl"])
        .assert()
        .success()
        .stdout(predicate::str::contains("planet=jupiter"));
}

#[cfg(unix)]
#[test]
fn test_non_utf8_environment_entries_are_skipped() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let project = TestProject::new().unwrap();
    project.write_file("p.tpl", "planet={{ env.TPLC_TEST_PLANET }}").unwrap();

    tplc_in(project.path())
        .env("TPLC_BAD", OsStr::from_bytes(b"\xff\xfe"))
        .env(OsStr::from_bytes(b"TPLC_\xff"), "value")
        .env("TPLC_TEST_PLANET", "saturn")
        .args(["render", "p.tpl"])
        .assert()
        .success()
        .stdout(predicate::str::contains("planet=saturn"));
}

#[test]
fn test_no_env_hides_environment() {
    let project = TestProject::new().unwrap();
    project
        .write_file("env.tpl", "{% if env is defined %}has env{% else %}no env{% endif %}")
        .unwrap();

    tplc_in(project.path())
        .args(["render", "env.tpl", "--no-env"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no env"));
}

#[test]
fn test_output_file_and_root() {
    let project = site_project();
    project
        .write_file(
            "src/pages/about.tpl",
            "{% extends \"_layout.tpl\" %}{% block body %}{{ slug }}{% endblock %}",
        )
        .unwrap();
    project.write_file("src/_layout.tpl", "[{% block body %}{% endblock %}]").unwrap();

    tplc_in(project.path())
        .args([
            "render",
            "src/pages/about.tpl",
            "--partial",
            "src/_layout.tpl",
            "--root",
            "src",
            "--output",
            "public/about.html",
            "--no-env",
        ])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(project.read_file("public/about.html").unwrap(), "[pages-about-tpl]");
}

#[test]
fn test_options_file() {
    let project = TestProject::new().unwrap();
    project.write_file("page.tpl", "{{ html }}|{{ page }}|{{ title | slug }}").unwrap();
    project.write_file("data.json", r#"{"html": "<b>", "title": "Hello World"}"#).unwrap();
    project
        .write_file(
            "options.json",
            r#"{"autoescape": true, "slug_key": "page", "slug": {"separator": "_"}}"#,
        )
        .unwrap();

    tplc_in(project.path())
        .args(["render", "page.tpl", "--data", "data.json", "--options", "options.json", "--no-env"])
        .assert()
        .success()
        .stdout(predicate::str::contains("&lt;b&gt;|page_tpl|hello_world"));
}

#[test]
fn test_invalid_front_matter_names_the_file() {
    let project = TestProject::new().unwrap();
    project
        .write_file("broken.tpl", "{% frontmatter %}{ name: mars }{% endfrontmatter %}hi")
        .unwrap();

    tplc_in(project.path())
        .args(["render", "broken.tpl", "--no-env"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid front matter in broken.tpl"));
}

#[test]
fn test_missing_variable_suggests_close_match() {
    let project = site_project();
    project.write_file("typo.tpl", "hello {{ nmae }}").unwrap();

    tplc_in(project.path())
        .args(["render", "typo.tpl", "--data", "data.json", "--no-env"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Template variable not found: 'nmae'"))
        .stderr(predicate::str::contains("  - name"));
}

#[test]
fn test_missing_layout_fails() {
    let project = site_project();

    tplc_in(project.path())
        .args(["render", "first.tpl", "--data", "data.json", "--no-env"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("_layout.tpl"));
}

#[test]
fn test_bad_inputs_fail_cleanly() {
    let project = TestProject::new().unwrap();
    project.write_file("page.tpl", "x").unwrap();
    project.write_file("list.json", "[1, 2, 3]").unwrap();
    project.write_file("options.json", r#"{"trimBlocks": true}"#).unwrap();

    tplc_in(project.path())
        .args(["render", "missing.tpl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.tpl"));

    tplc_in(project.path())
        .args(["render", "page.tpl", "--data", "list.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid data file list.json"));

    tplc_in(project.path())
        .args(["render", "page.tpl", "--options", "options.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid options file options.json"));
}
