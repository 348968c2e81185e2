use super::{MappingEntry, SpecialCase, ToolkitTable};

pub(super) static TABLE: ToolkitTable = ToolkitTable {
    name: "gtk",
    base_type: "Gtk.Widget",
    entries: &[
        MappingEntry::property("Widget", "ArrowTooltipText"),
        MappingEntry::property("Widget", "Label"),
        MappingEntry::property("Widget", "Title"),
        MappingEntry::property("Widget", "Markup"),
        MappingEntry::property("Widget", "MarkupWithMnemonic"),
        MappingEntry::property("Widget", "LabelProp"),
        MappingEntry::property("Widget", "TooltipText"),
        MappingEntry::property("Widget", "TooltipMarkup"),
        MappingEntry::property("Widget", "Text"),
        MappingEntry::method_arg("ComboBox", "AppendText", 0, "text"),
        MappingEntry::method_arg("Notebook", "SetTabLabelText", 1, "tab_text"),
        MappingEntry::method_arg("Notebook", "SetMenuLabelText", 1, "menu_text"),
        MappingEntry::method_arg("TreeView", "InsertColumn", 1, "title"),
        MappingEntry::constructor_arg("CheckButton", 0, "label"),
        MappingEntry::constructor_arg("Label", 0, "str"),
        MappingEntry::constructor_arg("MenuToolButton", 1, "label"),
        MappingEntry::constructor_arg("RadioButton", 0, "label"),
        MappingEntry::constructor_arg("RadioButton", 1, "label"),
        MappingEntry::constructor_arg("TreeViewColumn", 0, "title"),
    ],
    special_cases: &[
        // User input values
        SpecialCase {
            owner_type: "Entry",
            member_name: "Text",
            literal: None,
        },
        // Accessibility role of tooltip windows
        SpecialCase {
            owner_type: "Window",
            member_name: "Title",
            literal: Some("tooltip"),
        },
    ],
};
