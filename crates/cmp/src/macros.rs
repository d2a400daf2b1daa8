/// Asserts that two values are deeply equal under the given rules, printing
/// the diff on failure.
///
/// ```ignore
/// assert_cmp_eq!(actual, expected);
/// assert_cmp_eq!(actual, expected, placeholders::ignore());
/// ```
#[macro_export]
macro_rules! assert_cmp_eq {
	($left:expr, $right:expr $(, $rule:expr)* $(,)?) => {{
		let rules: &[$crate::Rule] = &[$($rule),*];
		let report = $crate::diff(&$left, &$right, rules);
		if !report.is_empty() {
			panic!("assertion `left == right` failed (deep comparison)\n{report}");
		}
	}};
}

/// Asserts that two values differ under the given rules.
#[macro_export]
macro_rules! assert_cmp_ne {
	($left:expr, $right:expr $(, $rule:expr)* $(,)?) => {{
		let rules: &[$crate::Rule] = &[$($rule),*];
		if $crate::equal(&$left, &$right, rules) {
			panic!(
				"assertion `left != right` failed (deep comparison)\n  left: {}\n right: {}",
				$crate::Render(&$left),
				$crate::Render(&$right)
			);
		}
	}};
}
