//! Keyed enter/update/exit reconciliation of rendered items against data.

use std::collections::HashMap;

/// Ids touched by one reconciliation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JoinDiff {
	/// New ids, in data order.
	pub added: Vec<String>,
	/// Ids present before and after, in data order.
	pub retained: Vec<String>,
	/// Ids no longer present, in previous render order.
	pub removed: Vec<String>,
}

/// Anything rendered for a keyed datum.
pub trait Keyed {
	fn key(&self) -> &str;
}

/// Reconciles `rendered` against `data`.
///
/// Items are re-ordered to follow `data`. `enter` builds the visual for an
/// added datum, `update` refreshes a retained one; removed visuals are
/// dropped.
pub fn join<D, V>(
	rendered: &mut Vec<V>,
	data: &[D],
	mut enter: impl FnMut(&D) -> V,
	mut update: impl FnMut(&mut V, &D),
) -> JoinDiff
where
	D: Keyed,
	V: Keyed,
{
	let previous_order: Vec<String> = rendered.iter().map(|v| v.key().to_string()).collect();
	let mut previous: HashMap<String, V> = rendered
		.drain(..)
		.map(|v| (v.key().to_string(), v))
		.collect();
	let mut diff = JoinDiff::default();

	for datum in data {
		match previous.remove(datum.key()) {
			Some(mut visual) => {
				update(&mut visual, datum);
				diff.retained.push(datum.key().to_string());
				rendered.push(visual);
			}
			None => {
				diff.added.push(datum.key().to_string());
				rendered.push(enter(datum));
			}
		}
	}

	diff.removed = previous_order
		.into_iter()
		.filter(|key| previous.contains_key(key))
		.collect();
	diff
}

#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Debug, PartialEq)]
	struct Item(String, u32);

	impl Keyed for Item {
		fn key(&self) -> &str {
			&self.0
		}
	}

	fn items(specs: &[(&str, u32)]) -> Vec<Item> {
		specs.iter().map(|(k, v)| Item(k.to_string(), *v)).collect()
	}

	#[test]
	fn computes_added_retained_removed() {
		let mut rendered = items(&[("a", 0), ("b", 0), ("c", 0)]);
		let data = items(&[("c", 1), ("d", 1), ("a", 1)]);
		let mut entered = 0;

		let diff = join(
			&mut rendered,
			&data,
			|d| {
				entered += 1;
				Item(d.0.clone(), 100)
			},
			|v, d| v.1 = d.1,
		);

		assert_eq!(diff.added, vec!["d"]);
		assert_eq!(diff.retained, vec!["c", "a"]);
		assert_eq!(diff.removed, vec!["b"]);
		assert_eq!(entered, 1);
		assert_eq!(rendered, items(&[("c", 1), ("d", 100), ("a", 1)]));
	}

	#[test]
	fn empty_data_removes_everything() {
		let mut rendered = items(&[("a", 0), ("b", 0)]);
		let diff = join(&mut rendered, &[] as &[Item], |_| unreachable!(), |_, _| {});
		assert_eq!(diff.removed, vec!["a", "b"]);
		assert!(rendered.is_empty());
	}
}
