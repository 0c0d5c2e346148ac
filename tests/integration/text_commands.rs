//! End-to-end tests for `tplc slugify` and `tplc escape`.

use predicates::prelude::*;

use crate::common::{TestProject, tplc_in};

fn run(args: &[&str]) -> assert_cmd::assert::Assert {
    let project = TestProject::new().unwrap();
    tplc_in(project.path()).args(args).assert()
}

#[test]
fn test_slugify_defaults() {
    run(&["slugify", "  Crème Brûlée, déjà vu!  "]).success().stdout("creme-brulee-deja-vu\n");
}

#[test]
fn test_slugify_flags() {
    run(&["slugify", "--camel", "HTTPServerName"]).success().stdout("http-server-name\n");
    run(&["slugify", "--keep-case", "-s", "_", "Hello World"]).success().stdout("Hello_World\n");
    run(&["slugify", "--no-separator", "first.tpl"]).success().stdout("firsttpl\n");
}

#[test]
fn test_escape_methods() {
    run(&["escape", "--method", "uri", "a b&c/d"]).success().stdout("a%20b%26c/d\n");
    run(&["escape", "--method", "1", "1.5*(2)"]).success().stdout("1\\.5\\*\\(2\\)\n");
}

#[test]
fn test_escape_unknown_method() {
    run(&["escape", "--method", "7", "x"])
        .failure()
        .stderr(predicate::str::contains("unknown escape method '7'"));
}
