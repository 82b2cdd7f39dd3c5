use crate::core::value_path::ValuePath;

/// Visual structure of a form: leaf fields and labeled groups for nested records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutItem {
    Field(ValuePath),
    Group {
        path: ValuePath,
        label: String,
        items: Vec<LayoutItem>,
    },
}

/// Leaf field paths in display order.
pub fn field_order(items: &[LayoutItem]) -> Vec<ValuePath> {
    let mut out = Vec::new();
    collect(items, &mut out);
    out
}

fn collect(items: &[LayoutItem], out: &mut Vec<ValuePath>) {
    for item in items {
        match item {
            LayoutItem::Field(path) => out.push(path.clone()),
            LayoutItem::Group { items, .. } => collect(items, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LayoutItem, field_order};
    use crate::core::value_path::ValuePath;

    #[test]
    fn groups_flatten_in_place() {
        let layout = vec![
            LayoutItem::Field(ValuePath::from_keys(["name"])),
            LayoutItem::Group {
                path: ValuePath::from_keys(["address"]),
                label: "Address".to_string(),
                items: vec![
                    LayoutItem::Field(ValuePath::from_keys(["address", "street"])),
                    LayoutItem::Field(ValuePath::from_keys(["address", "city"])),
                ],
            },
            LayoutItem::Field(ValuePath::from_keys(["age"])),
        ];
        let order: Vec<String> = field_order(&layout).iter().map(ToString::to_string).collect();
        assert_eq!(order, ["name", "address.street", "address.city", "age"]);
    }
}
