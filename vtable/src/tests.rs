use crate::*;

use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        debug_assert!(start < end_exclusive);
        start + (self.next_u64() % (end_exclusive - start) as u64) as usize
    }

    fn gen_bool(&mut self) -> bool {
        self.next_u64() >> 63 == 1
    }
}

#[derive(Clone, Debug)]
struct Person {
    id: i64,
    name: String,
    age: Option<i64>,
    score: f64,
}

impl Person {
    fn new(id: i64, name: &str, age: Option<i64>, score: f64) -> Self {
        Self {
            id,
            name: String::from(name),
            age,
            score,
        }
    }
}

impl Record for Person {
    fn field(&self, column: &str) -> Value<'_> {
        match column {
            "id" => Value::Int(self.id),
            "name" => Value::Text(&self.name),
            "age" => self.age.into(),
            "score" => Value::Float(self.score),
            _ => Value::Null,
        }
    }
}

fn trio() -> Vec<Person> {
    vec![
        Person::new(1, "Bob", Some(30), 1.5),
        Person::new(2, "alice", None, 2.0),
        Person::new(3, "Alice", Some(25), 1.0),
    ]
}

fn crowd(n: i64) -> Vec<Person> {
    (0..n)
        .map(|i| Person::new(i, &format!("user{i}"), Some(i % 90), i as f64 / 2.0))
        .collect()
}

fn ids(data: &[Person], rows: &[usize]) -> Vec<i64> {
    rows.iter().map(|&r| data[r].id).collect()
}

fn all_rows(data: &[Person]) -> Vec<usize> {
    (0..data.len()).collect()
}

fn by_id(p: &Person, _: usize) -> RowKey {
    RowKey::Num(p.id)
}

fn plain_headers() -> Vec<HeaderNode> {
    vec![
        Leaf::new("id", "ID").with_width(80).into(),
        Leaf::new("name", "Name").with_width(200).into(),
        Leaf::new("age", "Age").with_width(100).into(),
    ]
}

fn crowd_table(n: i64) -> Table<Person> {
    let mut t = Table::new(
        crowd(n),
        plain_headers(),
        KeySource::field("id"),
        TableOptions::default(),
    )
    .expect("valid headers");
    t.set_viewport(Viewport::new(800, 660));
    t
}

// Values

#[test]
fn value_text_and_ordering() {
    assert_eq!(Value::Float(1.0).to_text().as_deref(), Some("1"));
    assert_eq!(Value::Bool(true).to_text().as_deref(), Some("true"));
    assert_eq!(Value::Null.to_text(), None);

    use core::cmp::Ordering::*;
    assert_eq!(Value::Int(2).sort_cmp(&Value::Float(1.5)), Greater);
    assert_eq!(Value::Null.sort_cmp(&Value::Bool(false)), Less);
    assert_eq!(Value::Int(9).sort_cmp(&Value::Text("1")), Less);
    assert_eq!(Value::Text("B").sort_cmp(&Value::Text("a")), Less);
}

#[test]
fn selection_values_compare_in_the_cell_type() {
    assert!(Value::Int(30).matches_option("30"));
    assert!(Value::Int(30).matches_option("30.0"));
    assert!(!Value::Int(30).matches_option("thirty"));
    assert!(Value::Float(1.5).matches_option("1.5"));
    assert!(Value::Bool(true).matches_option("true"));
    assert!(Value::Text("x").matches_option("x"));
    assert!(!Value::Text("x").matches_option("X"));
    assert!(!Value::Null.matches_option(""));
}

// Pipeline

#[test]
fn sort_is_stable() {
    let data = vec![
        Person::new(1, "a", None, 0.0),
        Person::new(2, "a", None, 0.0),
    ];
    let mut sort = SortState::default();
    sort.set("name", SortDirection::Asc);
    assert_eq!(ids(&data, &sort.apply(&data, &all_rows(&data))), [1, 2]);
    sort.set("name", SortDirection::Desc);
    assert_eq!(ids(&data, &sort.apply(&data, &all_rows(&data))), [1, 2]);
}

#[test]
fn sort_click_cycles_and_other_column_restarts() {
    let mut sort = SortState::default();
    assert_eq!(sort.cycle("name"), SortDirection::Asc);
    assert_eq!(sort.cycle("name"), SortDirection::Desc);
    assert_eq!(sort.cycle("name"), SortDirection::Unset);
    assert_eq!(sort.column(), None);
    assert_eq!(sort.cycle("name"), SortDirection::Asc);

    sort.cycle("name");
    assert_eq!(sort.direction(), SortDirection::Desc);
    assert_eq!(sort.cycle("age"), SortDirection::Asc);
    assert_eq!(sort.column(), Some("age"));

    sort.set("id", SortDirection::Desc);
    assert_eq!((sort.column(), sort.direction()), (Some("id"), SortDirection::Desc));
    assert_eq!("desc".parse::<SortDirection>(), Ok(SortDirection::Desc));
    assert_eq!(
        "up".parse::<SortDirection>(),
        Err(Error::UnknownSortDirection(String::from("up")))
    );
}

#[test]
fn sort_runs_before_search() {
    let data = trio();
    let mut state = FilterState::default();
    state.sort.set("name", SortDirection::Asc);
    state.search.set("name", "ali");
    let rows = state.apply(&data, ServerDelegation::NONE);
    assert_eq!(ids(&data, &rows), [3, 2]);
}

#[test]
fn search_ands_columns_and_skips_null() {
    let data = trio();
    let mut search = SearchFilter::default();
    search.set("name", "B");
    assert_eq!(ids(&data, &search.apply(&data, &all_rows(&data))), [1]);

    search.set("name", "a");
    search.set("age", "2");
    // alice has no age, so only Alice (25) passes both terms.
    assert_eq!(ids(&data, &search.apply(&data, &all_rows(&data))), [3]);

    assert!(search.set("age", ""));
    assert_eq!(search.len(), 1);
    assert!(!search.remove("age"));
}

#[test]
fn selection_filter_matches_any_allowed_value() {
    let data = trio();
    let mut sel = SelectionFilter::default();
    sel.set("age", ["30", "25"]);
    assert_eq!(ids(&data, &sel.apply(&data, &all_rows(&data))), [1, 3]);
    sel.set("name", ["Bob", "alice"]);
    assert_eq!(ids(&data, &sel.apply(&data, &all_rows(&data))), [1]);

    assert!(sel.set("age", core::iter::empty::<&str>()));
    assert!(sel.get("age").is_none());
    assert_eq!(ids(&data, &sel.apply(&data, &all_rows(&data))), [1, 2]);
}

#[test]
fn advanced_operators_compare_lowercased() {
    let cases = [
        (FilterOperator::Equal, "alice", true),
        (FilterOperator::NotEqual, "bob", true),
        (FilterOperator::StartsWith, "AL", true),
        (FilterOperator::EndsWith, "CE", true),
        (FilterOperator::Contains, "lic", true),
        (FilterOperator::NotContains, "lic", false),
        (FilterOperator::Equal, "alic", false),
    ];
    for (op, value, expected) in cases {
        assert_eq!(op.test("alice", &value.to_lowercase()), expected, "{op} {value}");
    }

    let data = trio();
    let mut adv = AdvancedFilter::default();
    adv.set("name", AdvancedCriterion::new(FilterOperator::Equal, "ALICE"));
    assert_eq!(ids(&data, &adv.apply(&data, &all_rows(&data))), [2, 3]);

    assert!(adv.set("name", AdvancedCriterion::new(FilterOperator::None, "x")));
    assert!(adv.is_empty());
}

#[test]
fn unknown_operator_passes_through() {
    assert_eq!(
        "between".parse::<FilterOperator>(),
        Err(Error::UnknownOperator(String::from("between")))
    );
    assert_eq!(FilterOperator::parse_lenient("between"), FilterOperator::None);
    assert_eq!(FilterOperator::parse_lenient("notContains"), FilterOperator::NotContains);

    let mut t = Table::new(trio(), plain_headers(), KeySource::field("id"), TableOptions::default())
        .expect("valid headers");
    t.filter_advance_named("name", "between", "a");
    assert_eq!(t.rows().len(), 3);
    assert!(t.filters().advance.is_empty());
}

#[test]
fn pipeline_reruns_only_stale_stages() {
    let data = trio();
    let mut state = FilterState::default();
    state.sort.set("name", SortDirection::Asc);
    let mut p = Pipeline::new();
    assert!(p.run(&data, &state, ServerDelegation::NONE));
    assert_eq!(p.stage_rows(Stage::Sort), [2, 0, 1]);
    assert!(!p.run(&data, &state, ServerDelegation::NONE));

    state.search.set("name", "ali");
    p.invalidate(Stage::Search);
    assert!(p.run(&data, &state, ServerDelegation::NONE));
    assert_eq!(p.rows(), [2, 1]);
    assert!(p.is_fresh());
}

#[test]
fn delegated_stage_is_identity_but_notifies() {
    let log: Arc<Mutex<Vec<(String, SortDirection)>>> = Arc::default();
    let sink = Arc::clone(&log);
    let mut t = Table::new(
        trio(),
        plain_headers(),
        KeySource::field("id"),
        TableOptions::default().with_server(ServerDelegation::NONE.with(Stage::Sort, true)),
    )
    .expect("valid headers")
    .with_callbacks(TableCallbacks::new().on_sort_change(move |column, dir| {
        sink.lock().unwrap().push((String::from(column), dir));
    }));

    t.sort_by_column("name");
    assert_eq!(t.rows(), [0, 1, 2]);
    assert_eq!(t.sort_state().direction(), SortDirection::Asc);
    assert_eq!(*log.lock().unwrap(), [(String::from("name"), SortDirection::Asc)]);

    // Without a registered callback the criterion is still recorded.
    t.set_callbacks(TableCallbacks::new());
    t.sort_by_column("name");
    assert_eq!(t.sort_state().direction(), SortDirection::Desc);
    assert_eq!(t.rows(), [0, 1, 2]);
}

// Flattening

#[test]
fn expand_then_collapse_restores_flattening() {
    let data = crowd(60);
    let rows = all_rows(&data);
    let mut rng = Lcg::new(0xf1a7);
    let base = flatten(&data, &rows, &KeySet::default(), by_id);
    for _ in 0..50 {
        let k = RowKey::Num(rng.gen_range_usize(0, 60) as i64);
        let mut f = base.clone();
        assert_eq!(f.toggle(&k), Some(true));
        assert_eq!(f.len(), base.len() + 1);
        let at = f.flat_index_of(&k).expect("present");
        assert_eq!(f.get(at + 1).map(|it| it.kind), Some(FlatKind::Expanded));
        assert_eq!(f.toggle(&k), Some(false));
        assert_eq!(f, base);
        assert_eq!(f.to_vec(), base.to_vec());
    }
}

#[test]
fn expanded_items_follow_their_row() {
    let data = crowd(200);
    let mut rows = all_rows(&data);
    rows.reverse();
    let mut rng = Lcg::new(99);
    let mut expanded = KeySet::default();
    for i in 0..200 {
        if rng.gen_bool() {
            expanded.insert(RowKey::Num(i));
        }
    }
    let mut f = flatten(&data, &rows, &expanded, by_id);
    for _ in 0..100 {
        f.toggle(&RowKey::Num(rng.gen_range_usize(0, 200) as i64));
    }

    let items = f.to_vec();
    assert_eq!(items.len(), f.len());
    for (i, it) in items.iter().enumerate() {
        assert_eq!(f.get(i).as_ref(), Some(it));
        if it.kind == FlatKind::Expanded {
            let prev = items[i - 1];
            assert_eq!(prev.kind, FlatKind::Row);
            assert_eq!(prev.key, it.key);
        }
    }
    assert_eq!(f.get(items.len()), None);
}

#[test]
fn toggling_absent_key_is_noop() {
    let data = trio();
    let mut f = flatten(&data, &[0, 2], &KeySet::default(), by_id);
    let before = f.clone();
    assert_eq!(f.toggle(&RowKey::Num(2)), None);
    assert!(!f.set_expanded(&RowKey::from("nope"), true));
    assert_eq!(f, before);
}

#[test]
fn duplicate_keys_resolve_to_first_row() {
    let data = trio();
    let mut expanded = KeySet::default();
    expanded.insert(RowKey::from("k"));
    let f = flatten(&data, &[0, 1, 2], &expanded, |_, _| RowKey::from("k"));
    assert_eq!(f.ordinal_of(&RowKey::from("k")), Some(0));
    assert_eq!(f.len(), 4);
    assert_eq!(f.get(1).map(|it| (it.kind, it.row)), Some((FlatKind::Expanded, 0)));
    assert_eq!(f.get(2).map(|it| (it.kind, it.row)), Some((FlatKind::Row, 1)));
}

// Selection

#[test]
fn select_all_tracks_complement() {
    let mut s = SelectionState::new();
    s.select_all(true);
    let seven = RowKey::Num(7);
    assert!(!s.toggle(&seven));
    assert!(s.selected().is_empty());
    assert_eq!(s.deselected().len(), 1);
    assert!(s.deselected().contains(&seven));
    assert!(!s.is_selected(&seven));
    assert!(s.is_selected(&RowKey::Num(499_999)));
    assert_eq!(s.selected_count(500_000), 499_999);

    s.select_all(false);
    assert!(!s.is_select_all());
    assert!(s.deselected().is_empty());
    assert!(s.toggle(&seven));
    assert_eq!(s.selected().len(), 1);
    assert!(!s.toggle(&seven));
    assert!(s.selected().is_empty());
}

#[test]
fn checkbox_callback_reports_flag_and_sets() {
    let log: Arc<Mutex<Vec<(usize, usize, bool)>>> = Arc::default();
    let sink = Arc::clone(&log);
    let mut t = crowd_table(10).with_callbacks(TableCallbacks::new().on_change_checkbox_selection(
        move |sel, desel, all| sink.lock().unwrap().push((sel.len(), desel.len(), all)),
    ));
    t.select_all(true);
    t.toggle_row_selection(&RowKey::Num(7));
    t.select_all(false);
    t.toggle_row_selection(&RowKey::Num(3));
    assert_eq!(
        *log.lock().unwrap(),
        [(0, 0, true), (0, 1, true), (0, 0, false), (1, 0, false)]
    );
}

#[test]
fn selecting_absent_row_is_noop() {
    let calls = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&calls);
    let mut t = crowd_table(10).with_callbacks(TableCallbacks::new().on_change_checkbox_selection(
        move |_, _, _| {
            c.fetch_add(1, Ordering::SeqCst);
        },
    ));
    assert!(!t.toggle_row_selection(&RowKey::Num(999)));
    assert!(!t.is_selected(&RowKey::Num(999)));
    assert!(t.selection().selected().is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    // Rows hidden by a filter are absent too.
    t.search("name", "user1");
    assert!(!t.toggle_row_selection(&RowKey::Num(4)));
    assert!(t.toggle_row_selection(&RowKey::Num(1)));
    assert_eq!(t.selection().selected().len(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn active_row_click_rules() {
    let clicks = Arc::new(AtomicUsize::new(0));
    let doubles = Arc::new(AtomicUsize::new(0));
    let rights: Arc<Mutex<Vec<(i64, Position)>>> = Arc::default();

    let (c, d, r) = (Arc::clone(&clicks), Arc::clone(&doubles), Arc::clone(&rights));
    let mut t = crowd_table(5).with_callbacks(
        TableCallbacks::new()
            .on_click_row(move |_: &Person| {
                c.fetch_add(1, Ordering::SeqCst);
            })
            .on_double_click_row(move |_: &Person| {
                d.fetch_add(1, Ordering::SeqCst);
            })
            .on_right_click_row(move |p: &Person, pos| r.lock().unwrap().push((p.id, pos))),
    );

    assert!(t.click_row(&RowKey::Num(1)));
    assert!(!t.click_row(&RowKey::Num(1)));
    assert!(t.click_row(&RowKey::Num(2)));
    assert!(!t.click_row(&RowKey::Num(42)));
    assert_eq!(clicks.load(Ordering::SeqCst), 2);
    assert_eq!(t.active_row(), Some(&RowKey::Num(2)));

    // A click handler shadows double clicks.
    assert!(!t.double_click_row(&RowKey::Num(3)));
    assert_eq!(doubles.load(Ordering::SeqCst), 0);

    assert!(t.right_click_row(&RowKey::Num(2), Position::new(10, 20)));
    assert!(t.right_click_row(&RowKey::Num(4), Position::new(5, 6)));
    assert_eq!(t.active_row(), Some(&RowKey::Num(4)));
    assert_eq!(
        *rights.lock().unwrap(),
        [(2, Position::new(10, 20)), (4, Position::new(5, 6))]
    );

    let mut t = crowd_table(5).with_callbacks({
        let d = Arc::clone(&doubles);
        TableCallbacks::new().on_double_click_row(move |_: &Person| {
            d.fetch_add(1, Ordering::SeqCst);
        })
    });
    assert!(t.double_click_row(&RowKey::Num(3)));
    assert_eq!(doubles.load(Ordering::SeqCst), 1);
    assert_eq!(t.active_row(), Some(&RowKey::Num(3)));
}

// Columns

fn nested_headers() -> Vec<HeaderNode> {
    vec![
        Group::new(
            "g",
            "Group",
            [
                Group::new(
                    "g1",
                    "Inner",
                    [
                        Leaf::new("a", "A").with_width(100).into(),
                        Leaf::new("b", "B").with_width(100).into(),
                    ],
                )
                .into(),
                Leaf::new("c", "C").with_width(100).into(),
            ],
        )
        .into(),
        Leaf::new("d", "D").with_width(100).into(),
    ]
}

#[test]
fn resizing_nested_leaf_grows_every_ancestor() {
    let mut layout = ColumnLayout::new(nested_headers(), 160, 50).expect("valid headers");
    assert_eq!(layout.depth(), 2);
    assert_eq!(layout.width_of("g"), Some(300));

    let outcome = layout.commit_resize("a", 140).expect("leaf");
    assert_eq!(outcome, ResizeOutcome { top: 0, width: 140, delta: 40 });
    assert_eq!(layout.width_of("g"), Some(340));
    assert_eq!(layout.width_of("g1"), Some(240));
    assert_eq!(layout.width_of("b"), Some(100));
    assert_eq!(layout.width_of("c"), Some(100));
    assert_eq!(layout.width_of("d"), Some(100));
    assert_eq!(layout.top_width(0), 340);
    assert_eq!(layout.is_no_stretch("a"), Some(true));

    // Groups are not resizable themselves.
    assert_eq!(layout.commit_resize("g1", 10), None);
}

#[test]
fn resize_clamps_to_min_width() {
    let headers: Vec<HeaderNode> = vec![
        Leaf::new("a", "A").with_width(100).into(),
        Leaf::new("b", "B").with_width(100).with_min_width(80).into(),
    ];
    let mut layout = ColumnLayout::new(headers, 160, 50).expect("valid headers");

    let mut session = layout.begin_resize("b").expect("leaf");
    assert_eq!(session.update(35), 135);
    assert_eq!(session.update(-70), 80);
    assert_eq!(session.step(-5), 80);
    assert_eq!(session.step(80), 105);
    assert_eq!(layout.end_resize(session).map(|o| o.width), Some(105));

    assert_eq!(layout.commit_resize("a", 3).map(|o| o.width), Some(50));
}

#[test]
fn freeze_left_offsets_are_prefix_sums() {
    let headers: Vec<HeaderNode> = vec![
        Leaf::new("x", "X").with_width(40).frozen(Freeze::Left).into(),
        Leaf::new("y", "Y").with_width(40).frozen(Freeze::Left).into(),
        Leaf::new("m", "M").with_width(100).into(),
        Leaf::new("z", "Z").with_width(120).frozen(Freeze::Left).into(),
        Leaf::new("r1", "R1").with_width(30).frozen(Freeze::Right).into(),
        Leaf::new("r2", "R2").with_width(50).frozen(Freeze::Right).into(),
    ];
    let layout = ColumnLayout::new(headers, 160, 50).expect("valid headers");
    assert_eq!(layout.freeze_left(), [0, 1, 3]);
    assert_eq!(layout.left_offsets(), [0, 40, 80]);
    assert_eq!(layout.freeze_right(), [4, 5]);
    assert_eq!(layout.right_offsets(), [50, 0]);
    assert_eq!(layout.scrollable(), [2]);
    assert_eq!(layout.sticky_offset(3), Some((Freeze::Left, 80)));
    assert_eq!(layout.sticky_offset(2), None);
}

#[test]
fn declared_widths_below_minimum_are_kept() {
    let headers: Vec<HeaderNode> = vec![
        Leaf::new("x", "X").with_width(40).frozen(Freeze::Left).into(),
        Leaf::new("y", "Y").with_width(30).into(),
    ];
    let mut layout = ColumnLayout::new(headers, 160, 50).expect("valid headers");
    assert_eq!(layout.base_width("x"), Some(40));
    assert_eq!(layout.base_width("y"), Some(30));
    assert_eq!(layout.freeze_left_width(), 40);

    // The minimum still bounds user resizes, and a reset restores the declared width.
    assert_eq!(layout.commit_resize("y", 10).map(|o| o.width), Some(50));
    layout.reset_sizes(160);
    assert_eq!(layout.base_width("y"), Some(30));
    assert_eq!(layout.is_no_stretch("y"), Some(false));
}

fn stretch_headers() -> Vec<HeaderNode> {
    vec![
        Leaf::new("sel", "").with_width(40).frozen(Freeze::Left).into(),
        Leaf::new("a", "A").with_width(100).into(),
        Leaf::new("b", "B").with_width(150).into(),
        Leaf::new("fixed", "F").with_width(60).no_stretch().into(),
        Leaf::new("act", "").with_width(60).frozen(Freeze::Right).into(),
    ]
}

#[test]
fn stretch_fills_usable_width_exactly() {
    let mut layout = ColumnLayout::new(stretch_headers(), 160, 50).expect("valid headers");
    layout.set_viewport(Viewport::new(1000, 400).with_scrollbar(10));
    let usable = 1000 - 10 - 40 - 60;
    let widths = layout.scrollable_widths();
    assert_eq!(widths.iter().sum::<u32>(), usable);
    // 580 spare px over two eligible columns; the fixed column keeps 60.
    assert_eq!(widths, [390, 440, 60]);

    let mut rng = Lcg::new(3);
    for _ in 0..100 {
        let width = rng.gen_range_usize(1, 3000) as u32;
        layout.set_viewport(Viewport::new(width, 400));
        let sum: u32 = layout.scrollable_widths().iter().sum();
        let usable = width.saturating_sub(100);
        let declared = 100 + 150 + 60;
        if usable > declared {
            assert_eq!(sum, usable, "width={width}");
        } else {
            assert_eq!(sum, declared, "width={width}");
        }
    }
}

#[test]
fn stretch_is_skipped_without_eligible_columns() {
    let headers: Vec<HeaderNode> = vec![
        Leaf::new("a", "A").with_width(100).no_stretch().into(),
        Leaf::new("b", "B").with_width(100).no_stretch().into(),
    ];
    let mut layout = ColumnLayout::new(headers, 160, 50).expect("valid headers");
    layout.set_viewport(Viewport::new(1000, 400));
    assert_eq!(layout.scrollable_widths(), [100, 100]);
}

#[test]
fn header_validation() {
    let dup: Vec<HeaderNode> = vec![
        Leaf::new("a", "A").into(),
        Group::new("g", "G", [Leaf::new("a", "again").into()]).into(),
    ];
    assert_eq!(
        ColumnLayout::new(dup, 160, 50).err(),
        Some(Error::DuplicateColumnKey(String::from("a")))
    );
    let empty: Vec<HeaderNode> = vec![Group::new("g", "G", []).into()];
    assert_eq!(validate_headers(&empty), Err(Error::EmptyGroup(String::from("g"))));
}

#[test]
fn hidden_columns_leave_layout() {
    let mut layout = ColumnLayout::new(nested_headers(), 160, 50).expect("valid headers");
    assert_eq!(layout.toggle_visibility("g"), Some(false));
    assert_eq!(layout.scrollable(), [1]);
    assert_eq!(layout.depth(), 0);
    assert_eq!(layout.toggle_visibility("a"), None);
    let list = layout.visibility_list();
    assert_eq!(list.len(), 2);
    assert_eq!((list[0].key.as_str(), list[0].visible), ("g", false));
    assert_eq!(layout.set_visible("g", true), Some(true));
    assert_eq!(layout.scrollable(), [0, 1]);
}

// Table

#[test]
fn table_row_window_and_expansion() {
    let expanded: Arc<Mutex<Vec<i64>>> = Arc::default();
    let sink = Arc::clone(&expanded);
    let mut t = crowd_table(1000).with_callbacks(
        TableCallbacks::new().on_row_expand(move |p: &Person| sink.lock().unwrap().push(p.id)),
    );
    assert_eq!(t.header_height(), 32 + 28);
    assert_eq!(t.body_height(), 600);
    assert_eq!(t.total_height(), 28_000);

    let w = t.row_window();
    assert_eq!(w.range, VisibleRange { start_index: 0, end_index: 42 });
    assert_eq!(w.items.len(), 42);
    assert!(w.items.iter().all(|s| s.kind == FlatKind::Row && s.size == 28));

    let five = RowKey::Num(5);
    assert_eq!(t.toggle_expand(&five), Some(true));
    assert!(t.is_expanded(&five));
    assert_eq!(t.total_height(), 28_000 + 250);
    assert_eq!(*expanded.lock().unwrap(), [5]);

    let w = t.row_window();
    let detail = &w.items[6];
    assert_eq!(detail.kind, FlatKind::Expanded);
    assert_eq!((detail.flat_index, detail.row, detail.start, detail.size), (6, 5, 168, 250));
    assert_eq!(w.items[7].start, 6 * 28 + 250);
    assert_eq!(w.items[7].flat_index, 7);

    assert_eq!(t.toggle_expand(&five), Some(false));
    assert_eq!(t.total_height(), 28_000);
    assert_eq!(t.toggle_expand(&RowKey::Num(5000)), None);
}

#[test]
fn expansion_survives_filtering() {
    let mut t = crowd_table(100);
    t.toggle_expand(&RowKey::Num(17));
    t.search("name", "7");
    assert!(t.is_expanded(&RowKey::Num(17)));
    let flat = t.flattened();
    let at = flat.flat_index_of(&RowKey::Num(17)).expect("17 passes the filter");
    assert_eq!(flat.get(at + 1).map(|it| it.kind), Some(FlatKind::Expanded));

    t.search("name", "8");
    assert_eq!(t.flattened().flat_index_of(&RowKey::Num(17)), None);
    t.reset_search("name");
    assert!(t.flattened().is_expanded(&RowKey::Num(17)));
}

#[test]
fn filtering_clamps_scroll_and_window_sees_new_rows() {
    let mut t = crowd_table(1000);
    t.on_scroll(27_000, 0);
    t.search("name", "7");
    // 1000 - 9^3 ids contain a 7.
    assert_eq!(t.row_count(), 271);
    assert_eq!(t.scroll_top(), 271 * 28 - 600);
    let w = t.row_window();
    assert!(!w.items.is_empty());
    assert!(w.items.iter().all(|s| t.data()[s.row].name.contains('7')));
}

#[test]
fn batch_update_defers_until_the_end() {
    let mut t = crowd_table(50);
    t.batch_update(|t| {
        t.search("name", "1");
        t.set_sort("id", SortDirection::Desc);
        t.filter_advance("name", FilterOperator::NotContains, "0");
    });
    let got = ids(t.data(), t.rows());
    assert_eq!(got, [41, 31, 21, 19, 18, 17, 16, 15, 14, 13, 12, 11, 1]);
    assert_eq!(t.row_count(), got.len());
}

#[test]
fn expansion_inside_batch_sees_pending_filters() {
    let expanded: Arc<Mutex<Vec<i64>>> = Arc::default();
    let sink = Arc::clone(&expanded);
    let mut t = crowd_table(50).with_callbacks(
        TableCallbacks::new().on_row_expand(move |p: &Person| sink.lock().unwrap().push(p.id)),
    );
    let mut results = Vec::new();
    t.batch_update(|t| {
        t.search("name", "user2");
        // user5 is filtered out by the search above.
        results.push(t.toggle_expand(&RowKey::Num(5)));
        results.push(t.toggle_expand(&RowKey::Num(999)));
        results.push(t.toggle_expand(&RowKey::Num(21)));
    });
    assert_eq!(results, [None, None, Some(true)]);
    assert_eq!(*expanded.lock().unwrap(), [21]);
    assert!(!t.is_expanded(&RowKey::Num(5)));
    assert!(!t.is_expanded(&RowKey::Num(999)));
    assert!(t.is_expanded(&RowKey::Num(21)));

    // user2, user20..user29
    assert_eq!(t.row_count(), 11);
    assert_eq!(t.flattened().len(), 12);
    assert_eq!(t.total_height(), 11 * 28 + 250);
}

#[test]
fn reset_filters_notifies_each_removal() {
    let removed: Arc<Mutex<Vec<String>>> = Arc::default();
    let (a, b) = (Arc::clone(&removed), Arc::clone(&removed));
    let mut t = crowd_table(20).with_callbacks(
        TableCallbacks::new()
            .on_search_change(move |col, term| {
                if term.is_none() {
                    a.lock().unwrap().push(format!("search:{col}"));
                }
            })
            .on_sort_change(move |col, dir| {
                if dir == SortDirection::Unset {
                    b.lock().unwrap().push(format!("sort:{col}"));
                }
            }),
    );
    t.search("name", "1");
    t.sort_by_column("age");
    assert!(t.rows().len() < 20);
    t.reset_filters();
    assert!(t.filters().is_empty());
    assert_eq!(t.rows().len(), 20);
    let mut got = removed.lock().unwrap().clone();
    got.sort();
    assert_eq!(got, ["search:name", "sort:age"]);
}

#[test]
fn selection_options_fall_back_to_distinct_values() {
    let headers: Vec<HeaderNode> = vec![
        Leaf::new("name", "Name").into(),
        Leaf::new("age", "Age").with_filter_options(["young", "old"]).into(),
    ];
    let t = Table::new(trio(), headers, KeySource::field("id"), TableOptions::default())
        .expect("valid headers");
    assert_eq!(t.selection_options("age"), ["young", "old"]);
    assert_eq!(t.selection_options("name"), ["Alice", "Bob", "alice"]);
}

#[test]
fn table_columns_window_and_resize() {
    let mut t = Table::new(
        crowd(10),
        stretch_headers(),
        KeySource::func(|p: &Person, _| RowKey::Num(p.id)),
        TableOptions::default(),
    )
    .expect("valid headers");
    t.set_viewport(Viewport::new(1000, 500).with_scrollbar(10));

    let w = t.column_window();
    let sizes: Vec<u32> = w.items.iter().map(|c| c.size).collect();
    assert_eq!(sizes, [390, 440, 60]);
    assert_eq!(w.items[0].start, 40);
    assert_eq!(w.items[1].start, 430);
    assert_eq!(w.total_width, 40 + 890 + 60);
    assert_eq!(w.frozen_left.len(), 1);
    assert_eq!((w.frozen_left[0].key.as_str(), w.frozen_left[0].offset), ("sel", 0));
    assert_eq!((w.frozen_right[0].key.as_str(), w.frozen_right[0].width), ("act", 60));

    assert!(t.begin_resize("a"));
    assert_eq!(t.update_resize(-250), Some(140));
    let outcome = t.end_resize().expect("resized");
    assert_eq!(outcome.width, 140);
    assert!(t.resizing().is_none());

    // a is fixed now; b takes all the spare width.
    let sizes: Vec<u32> = t.column_window().items.iter().map(|c| c.size).collect();
    assert_eq!(sizes, [140, 690, 60]);
    assert_eq!(t.column_windowing().size_override(0), Some(140));

    assert_eq!(
        t.resize_column("nope", 10),
        Err(Error::UnknownColumn(String::from("nope")))
    );
}

#[test]
fn header_height_tracks_groups_filter_row_and_footer() {
    let mut t = Table::new(
        crowd(10),
        nested_headers(),
        KeySource::field("id"),
        TableOptions::default().with_footer(true),
    )
    .expect("valid headers");
    t.set_viewport(Viewport::new(800, 500));
    assert_eq!(t.header_height(), 32 + 2 * 32 + 28);
    assert_eq!(t.body_height(), 500 - 124 - 32);

    assert!(!t.toggle_filter_row());
    assert_eq!(t.header_height(), 96);
    assert_eq!(t.row_windowing().viewport_size(), 500 - 96 - 32);

    assert_eq!(t.toggle_column_visibility("g"), Some(false));
    assert_eq!(t.header_height(), 32);
}

#[test]
fn bottom_detection_fires_on_entry_only() {
    let mut d = BottomDetector::new(100, 100);
    assert!(!d.on_scroll(0, 600, 10_000, 0));
    assert!(d.on_scroll(9_350, 600, 10_000, 10));
    assert!(!d.on_scroll(9_360, 600, 10_000, 20));
    assert!(!d.on_scroll(5_000, 600, 10_000, 30));
    // Re-entry inside the throttle window is dropped.
    assert!(!d.on_scroll(9_400, 600, 10_000, 50));
    assert!(!d.on_scroll(9_400, 600, 10_000, 500));
    // More rows arrived.
    assert!(!d.on_scroll(9_400, 600, 20_000, 600));
    assert!(d.on_scroll(19_400, 600, 20_000, 700));
}

#[test]
fn table_reports_scroll_and_bottom() {
    let tops: Arc<Mutex<Vec<u64>>> = Arc::default();
    let bottoms = Arc::new(AtomicUsize::new(0));
    let (s, b) = (Arc::clone(&tops), Arc::clone(&bottoms));
    let mut t = crowd_table(100).with_callbacks(
        TableCallbacks::new()
            .on_scroll(move |top| s.lock().unwrap().push(top))
            .on_scroll_touch_bottom(move || {
                b.fetch_add(1, Ordering::SeqCst);
            }),
    );
    t.on_scroll(1_000, 0);
    t.on_scroll(2_800 - 600, 200);
    t.on_scroll(2_800 - 600, 400);
    assert_eq!(*tops.lock().unwrap(), [1_000, 2_200, 2_200]);
    assert_eq!(bottoms.load(Ordering::SeqCst), 1);

    t.append_data(crowd(150).into_iter().skip(100));
    t.on_scroll(4_200 - 600, 600);
    assert_eq!(bottoms.load(Ordering::SeqCst), 2);
}

#[test]
fn scroll_to_row_brings_key_into_view() {
    let mut t = crowd_table(1000);
    assert_eq!(t.scroll_to_row(&RowKey::Num(500), Align::Start), Some(14_000));
    assert_eq!(t.scroll_top(), 14_000);
    assert_eq!(t.row_window().items.iter().find(|s| s.row == 500).map(|s| s.start), Some(14_000));
    assert_eq!(t.scroll_to_row(&RowKey::Num(-1), Align::Start), None);
}

#[test]
fn reset_state_clears_interaction_state() {
    let mut t = crowd_table(30);
    t.toggle_expand(&RowKey::Num(1));
    t.select_all(true);
    t.click_row(&RowKey::Num(2));
    t.resize_column("name", 400).expect("leaf");
    t.search("name", "2");

    t.reset_state();
    assert!(t.expanded_keys().is_empty());
    assert!(!t.selection().is_select_all());
    assert_eq!(t.active_row(), None);
    assert_eq!(t.columns().base_width("name"), Some(200));
    assert_eq!(t.columns().is_no_stretch("name"), Some(false));
    // Criteria are not interaction state.
    assert_eq!(t.filters().search.get("name"), Some("2"));
    assert_eq!(t.total_height(), t.row_count() as u64 * 28);
}

#[test]
fn large_dataset_select_all_and_scroll() {
    let mut t = crowd_table(500_000);
    t.select_all(true);
    t.toggle_row_selection(&RowKey::Num(7));
    assert!(t.selection().selected().is_empty());
    assert!(!t.is_selected(&RowKey::Num(7)));
    assert!(t.is_selected(&RowKey::Num(8)));

    t.on_scroll(28 * 250_000, 0);
    let w = t.row_window();
    assert_eq!(w.range.start_index, 250_000 - 20);
    assert_eq!(w.items.len(), 22 + 40);
}
