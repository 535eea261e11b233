/// Integration tests for prompt expansion
use dynprompt::{
    generate_with_seed, ExpandError, ExpanderConfig, InMemoryWildcards, PassKind,
    PromptGenerator, QuantitySpec, RandomStream, SharedRng, WildcardLookup,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::sync::Arc;

fn colors() -> Arc<dyn WildcardLookup> {
    let wildcards = InMemoryWildcards::new();
    wildcards.add("color", ["red", "blue"]);
    Arc::new(wildcards)
}

fn run(template: &str, seed: u64) -> Result<String, ExpandError> {
    let mut prompts = generate_with_seed(template, 1, seed, Some(colors()))?;
    Ok(prompts.remove(0))
}

#[test]
fn test_template_without_syntax_is_identity() {
    for template in ["", "plain", "a | b $$ c", "under_score", "{unclosed", "closed}"] {
        assert_eq!(run(template, 1).unwrap(), template);
    }
}

#[test]
fn test_fixed_quantity_gives_distinct_variants() {
    for seed in 0..50 {
        let output = run("{3$$+$$a|b|c|d|e}", seed).unwrap();
        let picked: Vec<&str> = output.split(" + ").collect();
        assert_eq!(picked.len(), 3);
        let unique: HashSet<_> = picked.iter().collect();
        assert_eq!(unique.len(), 3, "duplicates in {output:?}");
    }
}

#[test]
fn test_quantity_above_variant_count_repeats() {
    for seed in 0..20 {
        let output = run("{5$$;$$a|b}", seed).unwrap();
        let picked: Vec<&str> = output.split(" ; ").collect();
        assert_eq!(picked.len(), 5);
        assert!(picked.iter().all(|p| *p == "a" || *p == "b"));
    }
}

#[test]
fn test_reversed_range_matches_forward_range() {
    for seed in 0..20 {
        let forward = run("{1-3$$a|b|c|d}", seed).unwrap();
        let reversed = run("{3-1$$a|b|c|d}", seed).unwrap();
        assert_eq!(forward, reversed);
    }
}

#[test]
fn test_range_bounds_are_respected() {
    for seed in 0..50 {
        let output = run("{2-3$$/$$a|b|c|d}", seed).unwrap();
        let count = output.split(" / ").count();
        assert!((2..=3).contains(&count), "got {output:?}");
    }
}

#[test]
fn test_default_quantity_can_be_empty() {
    let mut saw_empty = false;
    for seed in 0..100 {
        let output = run("[{a|b}]", seed).unwrap();
        assert!(["[]", "[a]", "[b]", "[a , b]", "[b , a]"].contains(&output.as_str()));
        saw_empty |= output == "[]";
    }
    assert!(saw_empty);
}

#[test]
fn test_unknown_wildcard_is_empty() {
    assert_eq!(run("a __nothing__ here", 3).unwrap(), "a  here");
}

#[test]
fn test_wildcard_example() {
    for seed in 0..10 {
        let output = run("__color__", seed).unwrap();
        assert!(output == "red" || output == "blue");
    }
}

#[test]
fn test_wildcard_inside_combination() {
    let output = run("{1$$__color__|__color__}", 4).unwrap();
    assert!(output == "red" || output == "blue");
}

#[test]
fn test_wildcard_variants_give_distinct_phrases() {
    for seed in 0..200 {
        let output = run("{2$$__color__|__color__}", seed).unwrap();
        assert!(output == "red , blue" || output == "blue , red", "got {output:?}");
    }
}

#[test]
fn test_huge_quantity_is_capped() {
    let config = ExpanderConfig::new().with_seed(1).with_max_combinations(3);
    let mut generator = PromptGenerator::new("{9999999999$$;$$a|b}", colors(), config);
    let output = generator.generate(1).unwrap().remove(0);
    assert_eq!(output.split(" ; ").count(), 3);
}

#[test]
fn test_seeded_generators_are_reproducible() {
    let template = "{2$$a|b|c|d}, __color__, {1-4$$w|x|y|z}";
    let config = ExpanderConfig::new().with_seed(2024);

    let mut first = PromptGenerator::new(template, colors(), config.clone());
    let mut second = PromptGenerator::new(template, colors(), config);

    assert_eq!(first.generate(10).unwrap(), second.generate(10).unwrap());
}

#[test]
fn test_generated_prompts_are_independent() {
    let mut generator =
        PromptGenerator::new("{1$$a|b|c|d|e|f}", colors(), ExpanderConfig::new().with_seed(8));
    let prompts = generator.generate(30).unwrap();
    assert_eq!(prompts.len(), 30);
    let unique: HashSet<_> = prompts.iter().collect();
    assert!(unique.len() > 1);
}

#[test]
fn test_shared_stream_interleaves_generators() {
    let shared = SharedRng::new(StdRng::seed_from_u64(77));
    let config = ExpanderConfig::new().unlinked(true);
    let template = "{1$$a|b|c|d|e|f|g|h}";

    let mut first = PromptGenerator::new(template, colors(), config.clone())
        .with_random_stream(RandomStream::Shared(shared.clone()));
    let mut second = PromptGenerator::new(template, colors(), config)
        .with_random_stream(RandomStream::Shared(shared));

    let mut alternating = Vec::new();
    for _ in 0..5 {
        alternating.extend(first.generate(1).unwrap());
        alternating.extend(second.generate(1).unwrap());
    }

    // Same draws as a single generator on a private stream with that seed
    let mut single = PromptGenerator::new(template, colors(), ExpanderConfig::new())
        .with_random_stream(RandomStream::seeded(77));
    assert_eq!(alternating, single.generate(10).unwrap());
}

#[test]
fn test_custom_defaults() {
    let config = ExpanderConfig::new()
        .with_seed(1)
        .with_joiner("and")
        .with_default_quantity(QuantitySpec::Exact(2));
    let mut generator = PromptGenerator::new("{cats|dogs}", colors(), config);
    let output = generator.generate(1).unwrap().remove(0);
    assert!(output == "cats and dogs" || output == "dogs and cats");
}

#[test]
fn test_malformed_expression_is_reported() {
    let err = run("a {1$$2$$3$$4$$x} b", 1).unwrap_err();
    match err {
        ExpandError::MalformedExpression { text, source } => {
            assert_eq!(text, "a {1$$2$$3$$4$$x} b");
            assert_eq!(source.span().start, 3);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_non_integer_quantity_is_reported() {
    assert!(matches!(
        run("{1.5$$a|b}", 1),
        Err(ExpandError::MalformedExpression { .. })
    ));
}

#[test]
fn test_cycle_terminates_with_recursion_error() {
    let wildcards = InMemoryWildcards::new();
    wildcards.add("ping", ["__pong__"]);
    wildcards.add("pong", ["__ping__"]);
    let config = ExpanderConfig::new().with_seed(1).with_max_recursions(7);

    let mut generator = PromptGenerator::new("__ping__", Arc::new(wildcards), config);
    let err = generator.generate(1).unwrap_err();
    assert_eq!(
        err,
        ExpandError::RecursionExceeded {
            limit: 7,
            pass: PassKind::Wildcard,
            text: "__pong__".to_string(),
        }
    );
}

#[test]
fn test_failed_prompt_aborts_generate() {
    let wildcards = InMemoryWildcards::new();
    wildcards.add("bad", ["{x$$a}"]);
    let mut generator = PromptGenerator::new(
        "__bad__",
        Arc::new(wildcards),
        ExpanderConfig::new().with_seed(1),
    );
    assert!(generator.generate(3).is_err());
}
