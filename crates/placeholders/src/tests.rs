use std::collections::HashSet;

use placeholders_cmp::{CmpError, Compare, Rule, diff, equal, try_equal};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::{fixture, rstest};

use crate::{Pointer, Ref, Scope, WeakRef, comparer, ignore, is_placeholder, make};

#[derive(Compare, Pointer, Clone, Default)]
#[compare(transparent)]
struct StringPtr(Option<Ref<String>>);

#[derive(Compare, Default)]
struct Embedded(i64);

#[derive(Compare, Default)]
struct TestStruct {
	embedded: Option<Ref<Embedded>>,
	other: Option<Ref<TestStruct>>,
	x: i64,
	s_ptr: Option<Ref<String>>,
	w: StringPtr,
	any: Option<Box<dyn Compare + Send + Sync>>,
}

#[derive(Compare)]
struct Foo {
	s_ptr: Ref<String>,
	s: String,
}

#[derive(Compare, Default)]
struct Chain {
	x: i64,
	next: Option<WeakRef<Chain>>,
}

#[derive(Compare, Default)]
struct Unit;

#[fixture]
fn scope() -> Scope {
	let _ = tracing_subscriber::fmt::try_init();
	Scope::new()
}

fn text(s: &str) -> Ref<String> {
	Ref::new(s.to_owned())
}

fn world() -> StringPtr {
	StringPtr(Some(text("world")))
}

type Case = (TestStruct, TestStruct, bool);

fn zero_values(_: &Scope) -> Case {
	(TestStruct::default(), TestStruct::default(), true)
}

fn simple_placeholder(scope: &Scope) -> Case {
	let a = TestStruct {
		x: 17,
		s_ptr: make(scope),
		w: world(),
		..Default::default()
	};
	let b = TestStruct {
		x: 17,
		s_ptr: Some(text("hello")),
		w: world(),
		..Default::default()
	};
	(a, b, true)
}

fn simple_placeholder_against_none(scope: &Scope) -> Case {
	let a = TestStruct {
		x: 17,
		s_ptr: make(scope),
		w: world(),
		..Default::default()
	};
	let b = TestStruct {
		x: 17,
		w: world(),
		..Default::default()
	};
	(a, b, true)
}

fn embedded_placeholder(scope: &Scope) -> Case {
	let a = TestStruct {
		embedded: make(scope),
		x: 17,
		w: world(),
		..Default::default()
	};
	let b = TestStruct {
		embedded: Some(Ref::new(Embedded(42))),
		x: 17,
		w: world(),
		..Default::default()
	};
	(a, b, true)
}

fn embedded_placeholder_against_none(scope: &Scope) -> Case {
	let a = TestStruct {
		embedded: make(scope),
		x: 17,
		w: world(),
		..Default::default()
	};
	let b = TestStruct {
		x: 17,
		w: world(),
		..Default::default()
	};
	(a, b, true)
}

fn wrapped_placeholder(scope: &Scope) -> Case {
	let a = TestStruct {
		x: 17,
		s_ptr: Some(text("hello")),
		w: make(scope),
		..Default::default()
	};
	let b = TestStruct {
		x: 17,
		s_ptr: Some(text("hello")),
		w: world(),
		..Default::default()
	};
	(a, b, true)
}

fn wrapped_placeholder_against_none(scope: &Scope) -> Case {
	let a = TestStruct {
		x: 17,
		s_ptr: Some(text("hello")),
		w: make(scope),
		..Default::default()
	};
	let b = TestStruct {
		x: 17,
		s_ptr: Some(text("hello")),
		..Default::default()
	};
	(a, b, true)
}

fn another_reference_to_the_placeholder(scope: &Scope) -> Case {
	let placeholder: Ref<String> = make(scope);
	let another = placeholder.clone();
	let a = TestStruct {
		x: 17,
		s_ptr: Some(another),
		w: world(),
		..Default::default()
	};
	let b = TestStruct {
		x: 17,
		s_ptr: Some(text("hello")),
		w: world(),
		..Default::default()
	};
	(a, b, true)
}

fn placeholder_in_a_referenced_struct(scope: &Scope) -> Case {
	let a = TestStruct {
		other: Some(Ref::new(TestStruct {
			x: 42,
			s_ptr: make(scope),
			..Default::default()
		})),
		x: 17,
		s_ptr: Some(text("hello")),
		w: make(scope),
		..Default::default()
	};
	let b = TestStruct {
		other: Some(Ref::new(TestStruct {
			x: 42,
			s_ptr: Some(text("hello")),
			..Default::default()
		})),
		x: 17,
		s_ptr: Some(text("hello")),
		w: world(),
		..Default::default()
	};
	(a, b, true)
}

fn difference_in_a_non_placeholder_field(scope: &Scope) -> Case {
	let a = TestStruct {
		x: 17,
		s_ptr: make(scope),
		w: make(scope),
		..Default::default()
	};
	let b = TestStruct {
		x: 42,
		s_ptr: Some(text("world")),
		w: world(),
		..Default::default()
	};
	(a, b, false)
}

fn placeholder_against_a_reference_to_another_type(scope: &Scope) -> Case {
	let a = TestStruct {
		x: 17,
		s_ptr: Some(text("hello")),
		any: Some(Box::new(make::<Ref<String>>(scope))),
		..Default::default()
	};
	let b = TestStruct {
		x: 17,
		s_ptr: Some(text("hello")),
		any: Some(Box::new(Ref::new(5_i64))),
		..Default::default()
	};
	(a, b, true)
}

#[rstest]
#[case::zero_values(zero_values)]
#[case::simple_placeholder(simple_placeholder)]
#[case::simple_placeholder_against_none(simple_placeholder_against_none)]
#[case::embedded_placeholder(embedded_placeholder)]
#[case::embedded_placeholder_against_none(embedded_placeholder_against_none)]
#[case::wrapped_placeholder(wrapped_placeholder)]
#[case::wrapped_placeholder_against_none(wrapped_placeholder_against_none)]
#[case::another_reference(another_reference_to_the_placeholder)]
#[case::referenced_struct(placeholder_in_a_referenced_struct)]
#[case::non_placeholder_difference(difference_in_a_non_placeholder_field)]
#[case::reference_to_another_type(placeholder_against_a_reference_to_another_type)]
fn placeholder_cases(scope: Scope, #[case] build: fn(&Scope) -> Case) {
	let (a, b, expected) = build(&scope);
	let rules = [ignore()];
	assert_eq!(equal(&a, &b, &rules), expected, "diff:\n{}", diff(&a, &b, &rules));
}

#[rstest]
fn usage_walkthrough(scope: Scope) {
	let hello = text("hello");

	assert!(equal(&make::<Ref<String>>(&scope), &hello, &[ignore()]));

	let placeholder: Ref<String> = make(&scope);
	let another = placeholder.clone();
	assert!(equal(&another, &hello, &[ignore()]));

	// The pointee is a plain empty string.
	assert!(!equal(&(*placeholder).clone(), &"hello".to_owned(), &[ignore()]));

	let expected = Foo {
		s_ptr: make(&scope),
		s: "world".to_owned(),
	};
	let actual = Foo {
		s_ptr: hello.clone(),
		s: "world".to_owned(),
	};
	assert!(equal(&expected, &actual, &[ignore()]));

	let expected = Foo {
		s_ptr: make(&scope),
		s: "earthlings".to_owned(),
	};
	assert!(!equal(&expected, &actual, &[ignore()]));
}

#[rstest]
fn distinct_placeholders_and_copied_pointees(scope: Scope) {
	#[derive(Compare)]
	struct Holder {
		s: Option<Ref<String>>,
	}

	let p1: Ref<String> = make(&scope);
	let p2: Ref<String> = make(&scope);
	assert!(!Ref::ptr_eq(&p1, &p2));
	assert!(Ref::token(&p1) != Ref::token(&p2));

	let expected = Holder { s: Some(p1.clone()) };
	let actual = Holder {
		s: Some(text("anything")),
	};
	assert!(equal(&expected, &actual, &[ignore()]));

	let copied: String = (*p1).clone();
	assert!(!equal(&copied, &"anything".to_owned(), &[ignore()]));
	assert!(equal(&copied, &String::new(), &[ignore()]));
}

#[rstest]
fn references_are_placeholders_but_pointees_are_not(scope: Scope) {
	let p: Ref<String> = make(&scope);
	assert!(is_placeholder(&p));
	assert!(is_placeholder(&p.clone()));
	assert!(!is_placeholder(&(*p).clone()));
	assert!(!is_placeholder(&*p));
	assert!(!is_placeholder(&text("")));
	assert!(!is_placeholder(&None::<Ref<String>>));
}

#[rstest]
fn named_and_embedded_pointers_are_recognized(scope: Scope) {
	let w: StringPtr = make(&scope);
	assert!(is_placeholder(&w));
	assert!(w.0.as_ref().is_some_and(|r| r.is_empty()));

	let embedded: Option<Ref<Embedded>> = make(&scope);
	assert!(is_placeholder(&embedded));

	let boxed: Box<dyn Compare + Send + Sync> = Box::new(make::<Ref<Embedded>>(&scope));
	assert!(is_placeholder(&boxed));
}

#[test]
fn scope_end_releases_placeholders() {
	let hello = text("hello");
	let scope = Scope::named("scope_end_releases_placeholders");
	let p: Ref<String> = make(&scope);
	assert!(equal(&p, &hello, &[ignore()]));

	scope.finish();
	assert!(!is_placeholder(&p));
	assert!(!equal(&p, &hello, &[ignore()]));
}

#[rstest]
fn zero_sized_placeholders_are_distinct(scope: Scope) {
	let units: Vec<Ref<Unit>> = (0..128).map(|_| make(&scope)).collect();
	let tokens: HashSet<_> = units.iter().map(Ref::token).collect();
	assert_eq!(tokens.len(), units.len());

	let ordinary = Ref::new(Unit);
	assert!(!tokens.contains(&Ref::token(&ordinary)));
	assert!(!is_placeholder(&ordinary));
	assert!(units.iter().all(|unit| is_placeholder(unit)));
}

#[rstest]
fn placeholder_against_self_cycle(scope: Scope) {
	let expected = Ref::new(Chain { x: 17, next: make(&scope) });
	let cycle = Ref::new_cyclic(|me| Chain {
		x: 17,
		next: Some(me.clone()),
	});
	assert!(equal(&expected, &cycle, &[ignore()]));
	assert!(equal(&*expected, &*cycle, &[ignore()]));

	// Without the rule the placeholder's zero value is compared.
	assert!(!equal(&expected, &cycle, &[]));

	let other = Ref::new_cyclic(|me| Chain {
		x: 17,
		next: Some(me.clone()),
	});
	assert!(equal(&cycle, &other, &[ignore()]));
}

#[rstest]
fn two_placeholders_match_each_other(scope: Scope) {
	let a: Ref<String> = make(&scope);
	let b: Ref<String> = make(&scope);
	assert!(equal(&a, &b, &[ignore()]));
	assert!(equal(&a, &b, &[comparer()]));

	let x: Box<dyn Compare + Send + Sync> = Box::new(make::<Ref<Unit>>(&scope));
	let y: Box<dyn Compare + Send + Sync> = Box::new(make::<Ref<Embedded>>(&scope));
	assert!(equal(&x, &y, &[ignore()]));
}

#[rstest]
fn comparer_conflicts_with_other_comparers(scope: Scope) {
	let p: Ref<String> = make(&scope);
	let hello = text("hello");
	let by_content = Rule::comparer(|a: &Ref<String>, b: &Ref<String>| **a == **b).named("by_content");

	let err = try_equal(&p, &hello, &[comparer(), by_content.clone()]);
	assert!(matches!(err, Err(CmpError::Ambiguous { ref rules, .. }) if rules.len() == 2), "{err:?}");

	// Ignore never conflicts.
	assert_eq!(try_equal(&p, &hello, &[ignore(), by_content.clone()]), Ok(true));
	// Pairs without a placeholder leave the custom comparer alone.
	assert_eq!(try_equal(&text("a"), &text("a"), &[comparer(), by_content]), Ok(true));
}

#[rstest]
fn comparer_rule_matches_like_ignore(scope: Scope) {
	let (a, b, _) = simple_placeholder(&scope);
	assert!(equal(&a, &b, &[comparer()]));
	let (a, b, _) = difference_in_a_non_placeholder_field(&scope);
	assert!(!equal(&a, &b, &[comparer()]));
}

proptest! {
	/// A placeholder matches any string, or no string at all.
	#[test]
	fn placeholder_matches_any_string(s in ".*") {
		let scope = Scope::new();
		let p: Option<Ref<String>> = make(&scope);
		prop_assert!(equal(&p, &Some(Ref::new(s.clone())), &[ignore()]));
		prop_assert!(equal(&Some(Ref::new(s)), &p, &[ignore()]));
		prop_assert!(equal(&p, &None::<Ref<String>>, &[ignore()]));
	}

	/// Boxed placeholders match boxed values of unrelated types.
	#[test]
	fn placeholder_matches_any_boxed_value(n in any::<i64>(), s in "[a-z]{0,8}") {
		let scope = Scope::new();
		let p: Box<dyn Compare + Send + Sync> = Box::new(make::<Ref<String>>(&scope));
		let number: Box<dyn Compare + Send + Sync> = Box::new(Ref::new(n));
		let string: Box<dyn Compare + Send + Sync> = Box::new(s);
		prop_assert!(equal(&p, &number, &[ignore()]));
		prop_assert!(equal(&p, &string, &[ignore()]));
	}

	/// Fields next to a placeholder are still compared.
	#[test]
	fn other_fields_are_still_compared(x in any::<i64>(), y in any::<i64>()) {
		let scope = Scope::new();
		let a = TestStruct { x, s_ptr: make(&scope), ..Default::default() };
		let b = TestStruct { x: y, s_ptr: Some(Ref::new(format!("{y}"))), ..Default::default() };
		prop_assert_eq!(equal(&a, &b, &[ignore()]), x == y);
	}

	/// Any number of allocations yields pairwise distinct identities.
	#[test]
	fn allocations_are_distinct(n in 1_usize..256) {
		let scope = Scope::new();
		let refs: Vec<Ref<()>> = (0..n).map(|_| make(&scope)).collect();
		let tokens: HashSet<_> = refs.iter().map(Ref::token).collect();
		prop_assert_eq!(tokens.len(), n);
	}
}
