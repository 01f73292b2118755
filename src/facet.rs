//! Dual-facet filtering over the video cards.
//!
//! A card is visible when it passes both the type facet and the format
//! facet. Each facet is driven by a group of buttons of which exactly one is
//! active; the group stores the active index so two active buttons cannot
//! be represented.

use crate::catalog::{Catalog, FilterButton};
use crate::error::StartupError;
use std::collections::BTreeSet;

pub const ALL: &str = "all";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Facet {
    Type,
    Format,
}

impl Facet {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Format => "format",
        }
    }

    pub fn button_class(self) -> &'static str {
        match self {
            Self::Type => "type-filter-btn",
            Self::Format => "format-filter-btn",
        }
    }
}

/// How the active type value is compared with a card's type tags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TypeMatchPolicy {
    /// The card's tag set contains the active value.
    Exact,
    /// Any tag of the card contains the active value as a substring.
    #[default]
    Substring,
}

impl TypeMatchPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Substring => "substring",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "exact" => Some(Self::Exact),
            "substring" => Some(Self::Substring),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavDirection {
    Previous,
    Next,
}

impl NavDirection {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Self::Previous),
            "ArrowRight" => Some(Self::Next),
            _ => None,
        }
    }
}

/// Index of the button focus moves to, wrapping at both ends.
pub fn neighbor_index(current: usize, len: usize, direction: NavDirection) -> Option<usize> {
    if current >= len {
        return None;
    }

    Some(match direction {
        NavDirection::Next => (current + 1) % len,
        NavDirection::Previous => (current + len - 1) % len,
    })
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    pub types: BTreeSet<String>,
    pub format: String,
}

impl Item {
    pub fn from_attributes(id: &str, type_attr: &str, format_attr: &str) -> Result<Self, StartupError> {
        let types: BTreeSet<String> = type_attr.split_whitespace().map(str::to_string).collect();
        if types.is_empty() {
            return Err(StartupError::EmptyTypes { id: id.to_string() });
        }

        let mut tokens = format_attr.split_whitespace();
        let Some(format) = tokens.next() else {
            return Err(StartupError::EmptyFormat { id: id.to_string() });
        };
        if tokens.next().is_some() {
            return Err(StartupError::MultipleFormats {
                id: id.to_string(),
                value: format_attr.trim().to_string(),
            });
        }

        Ok(Self {
            id: id.to_string(),
            types,
            format: format.to_string(),
        })
    }
}

pub fn type_matches(policy: TypeMatchPolicy, active: &str, types: &BTreeSet<String>) -> bool {
    if active == ALL {
        return true;
    }

    match policy {
        TypeMatchPolicy::Exact => types.contains(active),
        TypeMatchPolicy::Substring => types.iter().any(|tag| tag.contains(active)),
    }
}

pub fn format_matches(active: &str, format: &str) -> bool {
    active == ALL || format == active
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FacetButton {
    pub label: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FacetGroup {
    facet: Facet,
    buttons: Vec<FacetButton>,
    active: usize,
}

impl FacetGroup {
    pub fn from_buttons(facet: Facet, buttons: &[FilterButton]) -> Result<Self, StartupError> {
        let group = facet.as_str();
        let active: Vec<usize> = buttons
            .iter()
            .enumerate()
            .filter(|(_, button)| button.active)
            .map(|(index, _)| index)
            .collect();

        let active = match active.as_slice() {
            [] => return Err(StartupError::NoActiveButton { group }),
            [index] => *index,
            many => {
                return Err(StartupError::MultipleActiveButtons {
                    group,
                    count: many.len(),
                })
            }
        };

        if !buttons.iter().any(|button| button.value == ALL) {
            return Err(StartupError::MissingAllButton { group });
        }

        Ok(Self {
            facet,
            buttons: buttons
                .iter()
                .map(|button| FacetButton {
                    label: button.label.clone(),
                    value: button.value.clone(),
                })
                .collect(),
            active,
        })
    }

    pub fn facet(&self) -> Facet {
        self.facet
    }

    pub fn buttons(&self) -> &[FacetButton] {
        &self.buttons
    }

    pub fn active_value(&self) -> &str {
        &self.buttons[self.active].value
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.active == index
    }

    pub fn position(&self, value: &str) -> Option<usize> {
        self.buttons.iter().position(|button| button.value == value)
    }

    /// Activates the button at `index` and clears the rest of the group.
    /// Out-of-range indexes leave the group untouched.
    pub fn select_index(&mut self, index: usize) -> bool {
        if index >= self.buttons.len() {
            return false;
        }

        self.active = index;
        true
    }

    pub fn select_value(&mut self, value: &str) -> bool {
        match self.position(value) {
            Some(index) => self.select_index(index),
            None => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterState {
    pub active_type: String,
    pub active_format: String,
}

/// Lifecycle of the singleton "no results" notice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NoticeState {
    #[default]
    Absent,
    Shown,
    Hidden,
}

impl NoticeState {
    fn after_evaluation(self, visible_count: usize) -> Self {
        match (self, visible_count) {
            (_, 0) => Self::Shown,
            (Self::Absent, _) => Self::Absent,
            _ => Self::Hidden,
        }
    }

    pub fn is_shown(self) -> bool {
        matches!(self, Self::Shown)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Visibility {
    visible: Vec<bool>,
    count: usize,
}

impl Visibility {
    pub fn is_visible(&self, index: usize) -> bool {
        self.visible.get(index).copied().unwrap_or(false)
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FacetFilter {
    items: Vec<Item>,
    types: FacetGroup,
    formats: FacetGroup,
    policy: TypeMatchPolicy,
    notice: NoticeState,
    generation: u64,
}

impl FacetFilter {
    pub fn from_catalog(catalog: &Catalog, policy: TypeMatchPolicy) -> Result<Self, StartupError> {
        let items = catalog
            .videos
            .iter()
            .map(|video| Item::from_attributes(&video.id, &video.types, &video.format))
            .collect::<Result<Vec<_>, _>>()?;
        let types = FacetGroup::from_buttons(Facet::Type, &catalog.type_filters)?;
        let formats = FacetGroup::from_buttons(Facet::Format, &catalog.format_filters)?;

        let mut filter = Self {
            items,
            types,
            formats,
            policy,
            notice: NoticeState::Absent,
            generation: 0,
        };
        filter.refresh();
        Ok(filter)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn group(&self, facet: Facet) -> &FacetGroup {
        match facet {
            Facet::Type => &self.types,
            Facet::Format => &self.formats,
        }
    }

    fn group_mut(&mut self, facet: Facet) -> &mut FacetGroup {
        match facet {
            Facet::Type => &mut self.types,
            Facet::Format => &mut self.formats,
        }
    }

    pub fn policy(&self) -> TypeMatchPolicy {
        self.policy
    }

    pub fn notice(&self) -> NoticeState {
        self.notice
    }

    /// Bumped on every evaluation; the renderer keys the fade-in on it.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> FilterState {
        FilterState {
            active_type: self.types.active_value().to_string(),
            active_format: self.formats.active_value().to_string(),
        }
    }

    pub fn select_index(&mut self, facet: Facet, index: usize) -> bool {
        self.group_mut(facet).select_index(index)
    }

    pub fn select_facet(&mut self, facet: Facet, value: &str) -> bool {
        self.group_mut(facet).select_value(value)
    }

    pub fn matches(&self, item: &Item) -> bool {
        type_matches(self.policy, self.types.active_value(), &item.types)
            && format_matches(self.formats.active_value(), &item.format)
    }

    pub fn evaluate_visibility(&self) -> Visibility {
        let visible: Vec<bool> = self.items.iter().map(|item| self.matches(item)).collect();
        let count = visible.iter().filter(|flag| **flag).count();
        Visibility { visible, count }
    }

    /// Re-evaluates visibility and moves the notice to match the result.
    pub fn refresh(&mut self) -> Visibility {
        let visibility = self.evaluate_visibility();
        self.notice = self.notice.after_evaluation(visibility.count());
        self.generation = self.generation.wrapping_add(1);
        visibility
    }

    /// The notice's reset control: both groups back to "all".
    pub fn reset(&mut self) -> Visibility {
        self.types.select_value(ALL);
        self.formats.select_value(ALL);
        self.refresh()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::VideoEntry;

    fn button(value: &str, active: bool) -> FilterButton {
        FilterButton {
            label: value.to_string(),
            value: value.to_string(),
            active,
        }
    }

    fn video(id: &str, types: &str, format: &str) -> VideoEntry {
        VideoEntry {
            id: id.to_string(),
            title: id.to_uppercase(),
            embed: format!("https://player.example/{id}"),
            caption: None,
            types: types.to_string(),
            format: format.to_string(),
        }
    }

    fn sample_catalog() -> Catalog {
        Catalog {
            owner: "owner".to_string(),
            tagline: "tagline".to_string(),
            type_filters: vec![
                button("all", true),
                button("edit", false),
                button("promo", false),
                button("film", false),
            ],
            format_filters: vec![button("all", true), button("short", false), button("long", false)],
            videos: vec![video("a", "edit promo", "short"), video("b", "film", "long")],
        }
    }

    fn sample_filter() -> FacetFilter {
        FacetFilter::from_catalog(&sample_catalog(), TypeMatchPolicy::Exact).expect("valid catalog")
    }

    fn visible_ids(filter: &FacetFilter) -> Vec<String> {
        let visibility = filter.evaluate_visibility();
        filter
            .items()
            .iter()
            .enumerate()
            .filter(|(index, _)| visibility.is_visible(*index))
            .map(|(_, item)| item.id.clone())
            .collect()
    }

    #[test]
    fn default_state_shows_every_item() {
        let filter = sample_filter();

        assert_eq!(
            filter.state(),
            FilterState {
                active_type: "all".to_string(),
                active_format: "all".to_string(),
            }
        );
        assert_eq!(visible_ids(&filter), vec!["a", "b"]);
        assert_eq!(filter.notice(), NoticeState::Absent);
    }

    #[test]
    fn type_only_filter_ignores_format() {
        let mut filter = sample_filter();
        filter.select_facet(Facet::Type, "edit");

        assert_eq!(visible_ids(&filter), vec!["a"]);
    }

    #[test]
    fn format_only_filter_matches_exactly() {
        let mut filter = sample_filter();
        filter.select_facet(Facet::Format, "long");

        assert_eq!(visible_ids(&filter), vec!["b"]);
    }

    #[test]
    fn both_facets_intersect() {
        let mut filter = sample_filter();
        filter.select_facet(Facet::Type, "promo");
        filter.select_facet(Facet::Format, "short");
        assert_eq!(visible_ids(&filter), vec!["a"]);

        filter.select_facet(Facet::Type, "film");
        let visibility = filter.refresh();
        assert!(visibility.is_empty());
        assert!(filter.notice().is_shown());
    }

    #[test]
    fn exact_policy_rejects_partial_tags() {
        let mut catalog = sample_catalog();
        catalog.type_filters.push(button("pro", false));
        let mut filter = FacetFilter::from_catalog(&catalog, TypeMatchPolicy::Exact).expect("valid catalog");

        filter.select_facet(Facet::Type, "pro");
        assert!(visible_ids(&filter).is_empty());
    }

    #[test]
    fn substring_policy_accepts_partial_tags() {
        let mut catalog = sample_catalog();
        catalog.type_filters.push(button("pro", false));
        let mut filter =
            FacetFilter::from_catalog(&catalog, TypeMatchPolicy::Substring).expect("valid catalog");

        filter.select_facet(Facet::Type, "pro");
        assert_eq!(visible_ids(&filter), vec!["a"]);
    }

    #[test]
    fn selecting_keeps_exactly_one_active_button() {
        let mut filter = sample_filter();

        for index in [1, 3, 2, 0, 3] {
            assert!(filter.select_index(Facet::Type, index));
            let group = filter.group(Facet::Type);
            let active: Vec<usize> = (0..group.buttons().len()).filter(|i| group.is_active(*i)).collect();
            assert_eq!(active, vec![index]);
        }
        assert_eq!(filter.group(Facet::Format).active_value(), "all");
    }

    #[test]
    fn out_of_range_selection_is_ignored() {
        let mut filter = sample_filter();
        filter.select_index(Facet::Format, 2);

        assert!(!filter.select_index(Facet::Format, 9));
        assert!(!filter.select_facet(Facet::Format, "vertical"));
        assert_eq!(filter.group(Facet::Format).active_value(), "long");
    }

    #[test]
    fn notice_is_created_once_and_hidden_on_match() {
        let mut filter = sample_filter();
        filter.select_facet(Facet::Type, "film");
        filter.select_facet(Facet::Format, "short");

        filter.refresh();
        assert_eq!(filter.notice(), NoticeState::Shown);
        filter.refresh();
        assert_eq!(filter.notice(), NoticeState::Shown);

        filter.select_facet(Facet::Format, "long");
        filter.refresh();
        assert_eq!(filter.notice(), NoticeState::Hidden);
    }

    #[test]
    fn reset_restores_all_and_all() {
        let mut filter = sample_filter();
        filter.select_facet(Facet::Type, "film");
        filter.select_facet(Facet::Format, "short");
        filter.refresh();

        let visibility = filter.reset();

        assert_eq!(visibility.count(), 2);
        assert_eq!(filter.state().active_type, "all");
        assert_eq!(filter.state().active_format, "all");
        assert_eq!(filter.notice(), NoticeState::Hidden);
    }

    #[test]
    fn reset_matches_clicking_both_all_buttons() {
        let mut reset = sample_filter();
        reset.select_facet(Facet::Type, "film");
        reset.select_facet(Facet::Format, "short");
        reset.refresh();
        let mut clicked = reset.clone();

        reset.reset();
        for facet in [Facet::Type, Facet::Format] {
            let all = clicked.group(facet).position(ALL).expect("group has an all button");
            clicked.select_index(facet, all);
            clicked.refresh();
        }

        assert_eq!(clicked.state(), reset.state());
        assert_eq!(clicked.evaluate_visibility(), reset.evaluate_visibility());
        assert_eq!(clicked.notice(), reset.notice());
    }

    /// An arrow key focuses and clicks the neighbor; the click selects it.
    fn press_arrow(filter: &mut FacetFilter, facet: Facet, from: usize, key: &str) -> Option<usize> {
        let direction = NavDirection::from_key(key)?;
        let next = neighbor_index(from, filter.group(facet).buttons().len(), direction)?;
        filter.select_index(facet, next);
        filter.refresh();
        Some(next)
    }

    #[test]
    fn arrow_navigation_wraps_and_matches_direct_selection() {
        let mut navigated = sample_filter();
        let mut clicked = sample_filter();

        assert_eq!(press_arrow(&mut navigated, Facet::Type, 3, "ArrowRight"), Some(0));
        assert_eq!(press_arrow(&mut navigated, Facet::Type, 0, "ArrowLeft"), Some(3));
        assert_eq!(press_arrow(&mut navigated, Facet::Type, 3, "Tab"), None);

        clicked.select_index(Facet::Type, 3);
        clicked.refresh();

        assert_eq!(navigated.group(Facet::Type), clicked.group(Facet::Type));
        assert_eq!(navigated.evaluate_visibility(), clicked.evaluate_visibility());
        assert_eq!(navigated.notice(), clicked.notice());
    }

    #[test]
    fn neighbor_index_handles_edges() {
        assert_eq!(neighbor_index(0, 3, NavDirection::Previous), Some(2));
        assert_eq!(neighbor_index(2, 3, NavDirection::Next), Some(0));
        assert_eq!(neighbor_index(0, 1, NavDirection::Next), Some(0));
        assert_eq!(neighbor_index(0, 0, NavDirection::Next), None);
        assert_eq!(NavDirection::from_key("Enter"), None);
    }

    #[test]
    fn refresh_bumps_generation() {
        let mut filter = sample_filter();
        let before = filter.generation();

        filter.refresh();
        assert_eq!(filter.generation(), before + 1);
    }

    #[test]
    fn startup_rejects_group_without_active_button() {
        let mut catalog = sample_catalog();
        catalog.format_filters[0].active = false;

        assert_eq!(
            FacetFilter::from_catalog(&catalog, TypeMatchPolicy::Exact),
            Err(StartupError::NoActiveButton { group: "format" })
        );
    }

    #[test]
    fn startup_rejects_group_with_two_active_buttons() {
        let mut catalog = sample_catalog();
        catalog.type_filters[2].active = true;

        assert_eq!(
            FacetFilter::from_catalog(&catalog, TypeMatchPolicy::Exact),
            Err(StartupError::MultipleActiveButtons { group: "type", count: 2 })
        );
    }

    #[test]
    fn startup_requires_all_button() {
        let mut catalog = sample_catalog();
        catalog.format_filters = vec![button("short", true), button("long", false)];

        assert_eq!(
            FacetFilter::from_catalog(&catalog, TypeMatchPolicy::Exact),
            Err(StartupError::MissingAllButton { group: "format" })
        );
    }

    #[test]
    fn type_attribute_splits_on_whitespace() {
        let item = Item::from_attributes("a", " edit  promo ", "short").expect("valid attributes");

        assert_eq!(item.types.iter().map(String::as_str).collect::<Vec<_>>(), vec!["edit", "promo"]);
        assert_eq!(item.format, "short");
    }

    #[test]
    fn default_policy_matches_partial_tags() {
        assert_eq!(TypeMatchPolicy::default(), TypeMatchPolicy::Substring);

        let types: BTreeSet<String> = ["promo".to_string()].into_iter().collect();
        assert!(type_matches(TypeMatchPolicy::default(), "pro", &types));
        assert!(!type_matches(TypeMatchPolicy::Exact, "pro", &types));
    }

    #[test]
    fn startup_rejects_card_with_two_formats() {
        let mut catalog = sample_catalog();
        catalog.videos.push(video("c", "edit", "short long"));

        assert_eq!(
            FacetFilter::from_catalog(&catalog, TypeMatchPolicy::Exact),
            Err(StartupError::MultipleFormats {
                id: "c".to_string(),
                value: "short long".to_string(),
            })
        );
    }

    #[test]
    fn startup_rejects_card_without_format() {
        let mut catalog = sample_catalog();
        catalog.videos.push(video("c", "edit", "  "));

        assert_eq!(
            FacetFilter::from_catalog(&catalog, TypeMatchPolicy::Exact),
            Err(StartupError::EmptyFormat { id: "c".to_string() })
        );
    }
}
