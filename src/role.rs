//! Content categories a node can carry.
//!
//! Roles are the only semantic information the navigator looks at besides tree shape, heading
//! levels and table coordinates. The set mirrors what an accessibility tree exposes for web
//! content and desktop UI, trimmed to what the predicates and loaders use.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Enumerated content category of a node.
pub enum Role {
    /// Top of the whole graph; owns every window and document.
    Desktop,
    /// Native application window.
    Window,
    /// Modal or non-modal dialog.
    Dialog,
    /// Root of a loaded document.
    RootWebArea,
    /// Section heading, carrying a level from 1 to 6.
    Heading,
    /// Block of running text.
    Paragraph,
    /// Run of plain text.
    StaticText,
    /// Text box produced by line layout inside a static text run.
    InlineTextBox,
    /// Hard line break inside a paragraph.
    LineBreak,
    /// Hyperlink.
    Link,
    /// Push button.
    Button,
    /// Two- or three-state check box.
    CheckBox,
    /// Editable or selectable combo box.
    ComboBox,
    /// Single or multi line text input.
    TextField,
    /// Text input dedicated to search.
    SearchBox,
    /// Radio button.
    RadioButton,
    /// Slider.
    Slider,
    /// Numeric spin button.
    SpinButton,
    /// List of selectable options.
    ListBox,
    /// Button that opens a menu.
    PopUpButton,
    /// On/off switch.
    Switch,
    /// Data or layout table.
    Table,
    /// Table row.
    Row,
    /// Table data cell.
    Cell,
    /// Table column header cell.
    ColumnHeader,
    /// Table row header cell.
    RowHeader,
    /// List container.
    List,
    /// Item of a list.
    ListItem,
    /// Image.
    Image,
    /// Generic grouping.
    Group,
    /// Container without semantics of its own.
    GenericContainer,
    /// Toolbar.
    Toolbar,
    /// Quoted block.
    Blockquote,
    /// Preformatted code.
    Code,
}

impl Role {
    #[must_use]
    /// Whether nodes of this role flow within a line rather than starting their own block.
    pub fn is_inline(self) -> bool {
        matches!(
            self,
            Self::StaticText | Self::InlineTextBox | Self::LineBreak | Self::Link | Self::Image
        )
    }

    #[must_use]
    /// Whether this role marks a table cell of any kind.
    pub fn is_cell_like(self) -> bool {
        matches!(self, Self::Cell | Self::ColumnHeader | Self::RowHeader)
    }

    #[must_use]
    /// Whether this role is an interactive control a form is made of.
    pub fn is_form_control(self) -> bool {
        matches!(
            self,
            Self::Button
                | Self::CheckBox
                | Self::ComboBox
                | Self::TextField
                | Self::SearchBox
                | Self::RadioButton
                | Self::Slider
                | Self::SpinButton
                | Self::ListBox
                | Self::PopUpButton
                | Self::Switch
        )
    }

    #[must_use]
    /// Short human readable label used by the terminal UI and transcripts.
    pub fn label(self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Window => "window",
            Self::Dialog => "dialog",
            Self::RootWebArea => "document",
            Self::Heading => "heading",
            Self::Paragraph => "paragraph",
            Self::StaticText => "text",
            Self::InlineTextBox => "inline text",
            Self::LineBreak => "line break",
            Self::Link => "link",
            Self::Button => "button",
            Self::CheckBox => "check box",
            Self::ComboBox => "combo box",
            Self::TextField => "edit text",
            Self::SearchBox => "search box",
            Self::RadioButton => "radio button",
            Self::Slider => "slider",
            Self::SpinButton => "spin button",
            Self::ListBox => "list box",
            Self::PopUpButton => "pop up button",
            Self::Switch => "switch",
            Self::Table => "table",
            Self::Row => "row",
            Self::Cell => "cell",
            Self::ColumnHeader => "column header",
            Self::RowHeader => "row header",
            Self::List => "list",
            Self::ListItem => "list item",
            Self::Image => "image",
            Self::Group => "group",
            Self::GenericContainer => "container",
            Self::Toolbar => "toolbar",
            Self::Blockquote => "blockquote",
            Self::Code => "code",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
