// Example: build a table, measure it, scroll, and read both windows.
use vtable::{Freeze, HeaderNode, KeySource, Leaf, Record, Table, TableOptions, Value, Viewport};

struct Order {
    id: i64,
    customer: String,
    amount: f64,
}

impl Record for Order {
    fn field(&self, column: &str) -> Value<'_> {
        match column {
            "id" => Value::Int(self.id),
            "customer" => Value::Text(&self.customer),
            "amount" => Value::Float(self.amount),
            _ => Value::Null,
        }
    }
}

fn main() -> Result<(), vtable::Error> {
    let data: Vec<Order> = (0..100_000)
        .map(|i| Order {
            id: i,
            customer: format!("customer-{}", i % 977),
            amount: (i % 1000) as f64 * 1.5,
        })
        .collect();

    let headers: Vec<HeaderNode> = vec![
        Leaf::new("id", "ID").with_width(80).no_stretch().frozen(Freeze::Left).into(),
        Leaf::new("customer", "Customer").into(),
        Leaf::new("amount", "Amount").with_width(120).into(),
    ];

    let mut table = Table::new(data, headers, KeySource::field("id"), TableOptions::new())?;
    table.set_viewport(Viewport::new(1024, 768).with_scrollbar(16));
    println!(
        "header_height={} body_height={} total_height={}",
        table.header_height(),
        table.body_height(),
        table.total_height()
    );

    table.on_scroll(28 * 50_000, 0);
    let rows = table.row_window();
    println!("rows range={:?} first={:?}", rows.range, rows.items.first());

    let cols = table.column_window();
    for f in &cols.frozen_left {
        println!("frozen {} at {} width={}", f.key, f.offset, f.width);
    }
    for c in &cols.items {
        println!("column {} start={} width={}", c.key, c.start, c.size);
    }
    Ok(())
}
