//! Property tests for detection idempotence and token set invariants.

use std::sync::Arc;

use gale::{ResolvedOptions, TokenDetector, TokenStore, UserOptions, UtilsOptions};
use gale_config::resolve_options;
use proptest::collection::vec;
use proptest::prelude::*;

fn resolved() -> Arc<ResolvedOptions> {
    resolve_options(
        UserOptions::new().with_root(".").safelist("m-1").blocklist("hidden"),
        &UtilsOptions::default(),
        false,
    )
}

fn class() -> impl Strategy<Value = String> {
    "[a-z]{1,5}(-[a-z0-9]{1,3}){0,2}"
}

fn tag() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "a", "p", "nav", "section", "span", "html", "div", "RouterLink", "custom-el", "H2",
    ])
    .prop_map(str::to_string)
}

fn markup(classes: &[String], tags: &[String]) -> String {
    let mut content = format!("<x-root class=\"{}\">", classes.join(" "));
    for tag in tags {
        content.push_str(&format!("<{}></{}>", tag, tag));
    }
    content
}

#[derive(Debug, Clone)]
enum Op {
    Detect(Vec<String>, Vec<String>),
    CompileEveryOther,
    Preflight,
    Reseed,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (vec(class(), 0..6), vec(tag(), 0..4)).prop_map(|(c, t)| Op::Detect(c, t)),
        Just(Op::CompileEveryOther),
        Just(Op::Preflight),
        Just(Op::Reseed),
    ]
}

proptest! {
    #[test]
    fn detecting_twice_adds_nothing(classes in vec(class(), 0..12), tags in vec(tag(), 0..6)) {
        let options = resolved();
        let detector = TokenDetector::new(Arc::clone(&options));
        let mut store = TokenStore::new();
        store.reseed(&options);

        let content = markup(&classes, &tags);
        detector.detect(&mut store, &content, "index.html");
        let pending = store.pending_classes();

        let second = detector.detect(&mut store, &content, "index.html");
        prop_assert!(second.is_empty());
        prop_assert_eq!(store.pending_classes(), pending);
        prop_assert!(store.is_consistent());
    }

    #[test]
    fn sets_stay_consistent(ops in vec(op(), 1..24)) {
        let options = resolved();
        let detector = TokenDetector::new(Arc::clone(&options));
        let mut store = TokenStore::new();
        store.reseed(&options);

        for op in ops {
            match op {
                Op::Detect(classes, tags) => {
                    detector.detect(&mut store, &markup(&classes, &tags), "App.vue");
                }
                Op::CompileEveryOther => {
                    let success: Vec<String> =
                        store.pending_classes().into_iter().step_by(2).collect();
                    store.mark_compiled(&success);
                    for class in &success {
                        prop_assert!(!store.is_class_pending(class));
                    }
                }
                Op::Preflight => {
                    store.take_pending_tags();
                    prop_assert!(!store.has_pending_tags());
                }
                Op::Reseed => {
                    store.reseed(&options);
                    prop_assert!(store.compiled_classes().is_empty());
                    prop_assert!(store.compiled_tags().is_empty());
                    prop_assert!(!store.is_class_pending("hidden"));
                }
            }
            prop_assert!(store.is_consistent());
        }
    }
}
