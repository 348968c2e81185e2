use super::{MappingEntry, SpecialCase, ToolkitTable};

pub(super) static TABLE: ToolkitTable = ToolkitTable {
    name: "xwt",
    base_type: "Xwt.Widget",
    entries: &[
        MappingEntry::property("Widget", "Label"),
        MappingEntry::property("Widget", "Text"),
        MappingEntry::property("Widget", "TooltipText"),
        MappingEntry::property("Widget", "Title"),
        MappingEntry::property("Widget", "Markup"),
        MappingEntry::property("Widget", "PlaceholderText"),
        MappingEntry::constructor_arg("Label", 0, "text"),
        MappingEntry::constructor_arg("Button", 0, "label"),
        MappingEntry::constructor_arg("CheckBox", 0, "label"),
        MappingEntry::constructor_arg("RadioButton", 0, "label"),
        MappingEntry::constructor_arg("LinkLabel", 0, "text"),
    ],
    special_cases: &[SpecialCase {
        owner_type: "TextEntry",
        member_name: "Text",
        literal: None,
    }],
};
