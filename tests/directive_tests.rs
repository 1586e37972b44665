//! Global tree/dir/file directive behavior and claim ordering

mod common;

use common::BuildTree;
use modscout::config::{BuildConfig, Directive, PackageConfig};
use modscout::filter::PredicateRegistry;

#[test]
fn tree_directive_registers_subtree() {
    let tree = BuildTree::new();
    tree.file("extra/css/site.css", "body{}");
    tree.file("extra/logo.png", "png");
    tree.dir("src");

    let mut config = BuildConfig::new(tree.path("src"), tree.path("out"));
    config
        .trees
        .push(Directive::new(tree.path("extra"), tree.path("out/extra")));

    let report = modscout::run(&config, &PredicateRegistry::new()).expect("discovery failed");

    let css = report
        .registry
        .by_src(&tree.path("extra/css/site.css"))
        .expect("css registered");
    assert_eq!(css.dest, tree.path("out/extra/css/site.css"));
    assert!(css.tags.is_empty());
    assert!(!css.is_module());
}

#[test]
fn dir_directive_is_not_recursive() {
    let tree = BuildTree::new();
    tree.file("extra/top.txt", "top");
    tree.file("extra/sub/nested.txt", "nested");
    tree.dir("src");

    let mut config = BuildConfig::new(tree.path("src"), tree.path("out"));
    config
        .dirs
        .push(Directive::new(tree.path("extra"), tree.path("out/extra")));

    let report = modscout::run(&config, &PredicateRegistry::new()).expect("discovery failed");

    assert!(report.registry.by_src(&tree.path("extra/top.txt")).is_some());
    assert!(report
        .registry
        .by_src(&tree.path("extra/sub/nested.txt"))
        .is_none());
}

#[test]
fn file_directive_registers_single_pair() {
    let tree = BuildTree::new();
    let license = tree.file("LICENSE", "license");
    tree.dir("src");

    let mut config = BuildConfig::new(tree.path("src"), tree.path("out"));
    config
        .files
        .push(Directive::new(&license, tree.path("out/LICENSE")));

    let report = modscout::run(&config, &PredicateRegistry::new()).expect("discovery failed");
    assert_eq!(
        report.registry.by_src(&license).expect("license").dest,
        tree.path("out/LICENSE")
    );
}

#[test]
fn directive_excludes_with_negation() {
    let tree = BuildTree::new();
    tree.file("extra/skip.js", "//");
    tree.file("extra/keep.js", "//");
    tree.file("extra/readme.md", "#");
    tree.dir("src");

    let mut config = BuildConfig::new(tree.path("src"), tree.path("out"));
    config.trees.push(Directive::with_excludes(
        tree.path("extra"),
        tree.path("out/extra"),
        vec![
            "\\.js$".to_string(),
            "!".to_string(),
            "keep\\.js$".to_string(),
        ],
    ));

    let report = modscout::run(&config, &PredicateRegistry::new()).expect("discovery failed");

    // skip.js is excluded, keep.js is vetoed out of the exclusion
    assert!(report.registry.by_src(&tree.path("extra/skip.js")).is_none());
    assert!(report.registry.by_src(&tree.path("extra/keep.js")).is_some());
    assert!(report
        .registry
        .by_src(&tree.path("extra/readme.md"))
        .is_some());
}

#[test]
fn overlapping_global_tree_cannot_reclaim_package_files() {
    let tree = BuildTree::new();
    tree.file("src/app/util.js", "//");

    let mut config = BuildConfig::new(tree.path("src"), tree.path("out"));
    config
        .packages
        .push(PackageConfig::new("app", tree.path("src/app")));
    // geometrically overlaps the package root
    config.trees.push(Directive::new(
        tree.path("src/app"),
        tree.path("out/elsewhere"),
    ));

    let report = modscout::run(&config, &PredicateRegistry::new()).expect("discovery failed");

    let matches: Vec<_> = report
        .resources()
        .iter()
        .filter(|r| r.src == tree.path("src/app/util.js"))
        .collect();
    assert_eq!(matches.len(), 1);
    // the package claimed it; the overlapping tree saw an already-walked dir
    assert_eq!(matches[0].dest, tree.path("out/app/util.js"));
}

#[test]
fn two_directives_on_same_tree_walk_once() {
    let tree = BuildTree::new();
    tree.file("extra/a.txt", "a");
    tree.dir("src");

    let mut config = BuildConfig::new(tree.path("src"), tree.path("out"));
    config
        .trees
        .push(Directive::new(tree.path("extra"), tree.path("out/first")));
    config
        .trees
        .push(Directive::new(tree.path("extra"), tree.path("out/second")));

    let report = modscout::run(&config, &PredicateRegistry::new()).expect("discovery failed");

    let a = report
        .registry
        .by_src(&tree.path("extra/a.txt"))
        .expect("a.txt");
    assert_eq!(a.dest, tree.path("out/first/a.txt"));
    assert_eq!(report.resources().len(), 1);
}

#[test]
fn cleanup_roots_cover_all_destinations() {
    let tree = BuildTree::new();
    tree.file("src/app/util.js", "//");
    tree.file("src/app/nls/fr.js", "//");
    tree.file("aux/readme.md", "#");

    let mut config = BuildConfig::new(tree.path("src"), tree.path("out"));
    config
        .packages
        .push(PackageConfig::new("app", tree.path("src/app")));
    config
        .trees
        .push(Directive::new(tree.path("aux"), tree.path("alt-out")));

    let report = modscout::run(&config, &PredicateRegistry::new()).expect("discovery failed");

    // the nls destination folds into out/app; alt-out stands alone
    assert_eq!(
        report.cleanup_roots,
        vec![tree.path("alt-out"), tree.path("out/app")]
    );
}
