//! Specific cases: rewriting a tile's borders after they are placed

use crate::terrain::{BorderRule, SpecificCaseRule};
use tilebrush_core::{ItemTypes, Tile};

/// Run the specific cases of `rules` over the border items of `tile`.
///
/// A rule queued more than once runs once, in the order it was first queued.
/// Returns how many cases fired.
pub fn apply_specific_cases(tile: &mut Tile, items: &ItemTypes, rules: &[&BorderRule]) -> usize {
    let mut unique: Vec<&BorderRule> = Vec::with_capacity(rules.len());
    for &rule in rules {
        if !unique.iter().any(|seen| std::ptr::eq(*seen, rule)) {
            unique.push(rule);
        }
    }

    let mut fired = 0;
    for case in unique.iter().flat_map(|rule| &rule.specific_cases) {
        if count_matches(tile, items, case) >= case.conditions.len() {
            run_case(tile, items, case);
            fired += 1;
        }
    }
    fired
}

/// Matches over the bottom run of border items. An item matched through the
/// group condition is not also checked against the literal ids; every equal
/// literal condition counts separately.
fn count_matches(tile: &Tile, items: &ItemTypes, case: &SpecificCaseRule) -> usize {
    let mut matches = 0;
    for item in &tile.items {
        let Some(item_type) = items.get(item.id).filter(|t| t.is_border) else {
            break;
        };

        if let Some((group, edge)) = case.match_group {
            if item_type.border_group == group && item_type.border_alignment == edge {
                matches += 1;
                continue;
            }
        }
        matches += case.item_matches(item.id);
    }
    matches
}

fn run_case(tile: &mut Tile, items: &ItemTypes, case: &SpecificCaseRule) {
    let mut replaced = case.delete_all;
    let mut index = 0;

    while index < tile.items.len() {
        let id = tile.items[index].id;
        if !items.is_border(id) || case.item_matches(id) == 0 {
            index += 1;
            continue;
        }

        match case.replace {
            Some(replace) if !replaced && replace.from == id => {
                if let Some(item) = items.create_item(replace.with) {
                    tile.items[index] = item;
                }
                replaced = true;
            }
            _ if case.delete_all || !case.keep_border => {
                tile.items.remove(index);
                continue;
            }
            _ => {}
        }
        index += 1;
    }
}
