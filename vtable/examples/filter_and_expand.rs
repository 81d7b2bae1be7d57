// Example: the filter pipeline, row expansion and filter callbacks working together.
use vtable::{
    Align, FilterOperator, Group, HeaderNode, KeySource, Leaf, Record, RowKey, SortDirection,
    Table, TableCallbacks, TableOptions, Value, Viewport,
};

struct Ticket {
    id: i64,
    title: String,
    status: &'static str,
}

impl Record for Ticket {
    fn field(&self, column: &str) -> Value<'_> {
        match column {
            "id" => Value::Int(self.id),
            "title" => Value::Text(&self.title),
            "status" => Value::Text(self.status),
            _ => Value::Null,
        }
    }
}

fn main() -> Result<(), vtable::Error> {
    const STATUSES: [&str; 3] = ["open", "blocked", "closed"];
    let data: Vec<Ticket> = (0..5_000)
        .map(|i| Ticket {
            id: i,
            title: format!("Ticket #{i}"),
            status: STATUSES[(i % 3) as usize],
        })
        .collect();

    let headers: Vec<HeaderNode> = vec![
        Leaf::new("id", "ID").with_width(80).into(),
        Group::new(
            "info",
            "Info",
            [
                Leaf::new("title", "Title").into(),
                Leaf::new("status", "Status")
                    .with_filter_options(STATUSES)
                    .into(),
            ],
        )
        .into(),
    ];

    let callbacks = TableCallbacks::new()
        .on_sort_change(|col, dir| println!("sort {col} -> {dir}"))
        .on_search_change(|col, term| println!("search {col} -> {term:?}"))
        .on_advance_change(|col, c| println!("advance {col} -> {c:?}"))
        .on_row_expand(|t: &Ticket| println!("expanded {}", t.title));

    let mut table = Table::new(data, headers, KeySource::field("id"), TableOptions::new())?
        .with_callbacks(callbacks);
    table.set_viewport(Viewport::new(900, 600));

    table.batch_update(|t| {
        t.filter_selection("status", ["open", "blocked"]);
        t.search("title", "99");
        t.set_sort("id", SortDirection::Desc);
    });
    println!("rows after filters: {}", table.row_count());

    table.filter_advance("title", FilterOperator::EndsWith, "9");
    println!("rows after advanced filter: {}", table.row_count());

    let key = RowKey::Num(4999);
    table.toggle_expand(&key);
    if let Some(offset) = table.scroll_to_row(&key, Align::Center) {
        println!("scrolled to {offset}, total_height={}", table.total_height());
    }
    for slot in table.row_window().items.iter().take(4) {
        println!("{:?} {} start={} size={}", slot.kind, slot.key, slot.start, slot.size);
    }

    table.reset_filters();
    println!("rows after reset: {}", table.row_count());
    Ok(())
}
