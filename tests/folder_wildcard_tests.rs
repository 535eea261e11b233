/// Tests for wildcard files loaded from disk
use dynprompt::{
    ChainWildcards, ExpanderConfig, FolderWildcards, InMemoryWildcards, LoadError, PromptGenerator,
    WildcardLookup,
};
use std::collections::BTreeSet;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

/// Create a wildcard tree:
///
/// ```text
/// color.txt
/// animals/cats.txt
/// animals/dogs.txt
/// notes.md
/// ```
fn wildcard_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("color.txt"), "# primary colors\nred\n\nblue\n").unwrap();
    fs::create_dir(dir.path().join("animals")).unwrap();
    fs::write(dir.path().join("animals/cats.txt"), "tabby\nsiamese\n").unwrap();
    fs::write(dir.path().join("animals/dogs.txt"), "pug\n  beagle  \n").unwrap();
    fs::write(dir.path().join("notes.md"), "not a wildcard\n").unwrap();
    dir
}

fn phrases(lookup: &dyn WildcardLookup, name: &str) -> BTreeSet<String> {
    lookup
        .matching(name)
        .unwrap()
        .iter()
        .flat_map(|source| source.phrases().iter().cloned())
        .collect()
}

#[test]
fn test_list_available() {
    let dir = wildcard_dir();
    let wildcards = FolderWildcards::new(dir.path());
    assert_eq!(
        wildcards.list_available().unwrap(),
        vec!["animals/cats", "animals/dogs", "color"]
    );
}

#[test]
fn test_exact_name() {
    let dir = wildcard_dir();
    let wildcards = FolderWildcards::new(dir.path());
    let expected: BTreeSet<String> = ["blue", "red"].iter().map(|s| s.to_string()).collect();
    assert_eq!(phrases(&wildcards, "color"), expected);
}

#[test]
fn test_nested_name_and_trimming() {
    let dir = wildcard_dir();
    let wildcards = FolderWildcards::new(dir.path());
    let expected: BTreeSet<String> = ["beagle", "pug"].iter().map(|s| s.to_string()).collect();
    assert_eq!(phrases(&wildcards, "animals/dogs"), expected);
}

#[test]
fn test_glob_pools_files() {
    let dir = wildcard_dir();
    let wildcards = FolderWildcards::new(dir.path());
    let sources = wildcards.matching("animals/*").unwrap();
    assert_eq!(sources.len(), 2);
    assert_eq!(phrases(&wildcards, "animals/*").len(), 4);
}

#[test]
fn test_star_does_not_cross_directories() {
    let dir = wildcard_dir();
    let wildcards = FolderWildcards::new(dir.path());
    let names: Vec<String> = wildcards
        .matching("*")
        .unwrap()
        .iter()
        .map(|source| source.name().to_string())
        .collect();
    assert_eq!(names, vec!["color"]);
}

#[test]
fn test_unknown_name_has_no_sources() {
    let dir = wildcard_dir();
    let wildcards = FolderWildcards::new(dir.path());
    assert!(wildcards.matching("notes").unwrap().is_empty());
    assert!(wildcards.matching("missing").unwrap().is_empty());
}

#[test]
fn test_path_traversal_is_rejected() {
    let dir = wildcard_dir();
    let wildcards = FolderWildcards::new(dir.path().join("animals"));
    assert!(matches!(
        wildcards.matching("../color"),
        Err(LoadError::InvalidPath(_))
    ));
}

#[test]
fn test_generate_from_folder() {
    let dir = wildcard_dir();
    let lookup = Arc::new(FolderWildcards::new(dir.path()));
    let mut generator = PromptGenerator::new(
        "a __color__ __animals/*__",
        lookup,
        ExpanderConfig::new().with_seed(10),
    );

    let colors = ["red", "blue"];
    let animals = ["tabby", "siamese", "pug", "beagle"];
    for prompt in generator.generate(20).unwrap() {
        let words: Vec<&str> = prompt.split(' ').collect();
        assert_eq!(words.len(), 3, "got {prompt:?}");
        assert!(colors.contains(&words[1]));
        assert!(animals.contains(&words[2]));
    }
}

#[test]
fn test_chain_with_memory_overlay() {
    let dir = wildcard_dir();
    let extra = InMemoryWildcards::new();
    extra.add("color", ["green"]);

    let chain = ChainWildcards::new()
        .with_lookup(Arc::new(FolderWildcards::new(dir.path())))
        .with_lookup(Arc::new(extra));

    assert_eq!(phrases(&chain, "color").len(), 3);
}

#[test]
fn test_missing_folder_degrades_to_empty() {
    let lookup = Arc::new(FolderWildcards::new("/nonexistent/dynprompt-wildcards"));
    let mut generator =
        PromptGenerator::new("[__color__]", lookup, ExpanderConfig::new().with_seed(1));
    assert_eq!(generator.generate(1).unwrap(), vec!["[]"]);
}
