use super::{Host, Outcome, OutputEvent, ReadStep, Session};
use crate::command::Command;
use crate::cursor::{Range, Unit};
use crate::error::NavError;
use crate::navigator::Direction;
use crate::role::Role;
use crate::tree::{CellCoords, NodeData, NodeId, Tree};
use std::collections::HashMap;

#[derive(Default)]
struct Recorder {
    presented: Vec<(Range, OutputEvent)>,
    announced: Vec<&'static str>,
    spoken: Vec<String>,
    activated: Vec<NodeId>,
    menus: Vec<NodeId>,
}

impl Host for Recorder {
    fn present(&mut self, _tree: &Tree, range: &Range, _previous: Option<&Range>, event: OutputEvent) {
        self.presented.push((*range, event));
    }

    fn announce(&mut self, key: &'static str) {
        self.announced.push(key);
    }

    fn speak(&mut self, text: &str) {
        self.spoken.push(text.to_string());
    }

    fn activate(&mut self, _tree: &Tree, node: NodeId) {
        self.activated.push(node);
    }

    fn show_context_menu(&mut self, _tree: &Tree, node: NodeId) {
        self.menus.push(node);
    }
}

fn at(tree: &Tree, id: NodeId) -> Range {
    Range::from_node(tree.node(id).unwrap())
}

fn session_at(tree: &Tree, id: NodeId) -> Session {
    Session::starting_at(at(tree, id))
}

/// doc > [heading 1 "A", paragraph > text "B", heading 2 "C"]
fn headings() -> (Tree, [NodeId; 3]) {
    let mut tree = Tree::new(NodeData::new(Role::RootWebArea).with_name("doc"));
    let doc = tree.root_id();
    let a = tree.append(doc, NodeData::new(Role::Heading).with_level(1).with_name("A"));
    let p = tree.append(doc, NodeData::new(Role::Paragraph));
    let b = tree.append(p, NodeData::new(Role::StaticText).with_name("B"));
    let c = tree.append(doc, NodeData::new(Role::Heading).with_level(2).with_name("C"));
    (tree, [a, b, c])
}

/// doc > [text "before", table > 2x2 cells each holding a text leaf]; returns cells row-major.
fn table() -> (Tree, NodeId, [NodeId; 4]) {
    let mut tree = Tree::new(NodeData::new(Role::RootWebArea));
    let doc = tree.root_id();
    let before = tree.append(doc, NodeData::new(Role::StaticText).with_name("before"));
    let table = tree.append(doc, NodeData::new(Role::Table));
    let mut cells = [before; 4];
    for r in 0..2 {
        let row = tree.append(table, NodeData::new(Role::Row));
        for c in 0..2 {
            let cell = tree.append(row, NodeData::new(Role::Cell).with_cell(r, c));
            tree.append(cell, NodeData::new(Role::StaticText).with_name(format!("r{r}c{c}")));
            cells[r * 2 + c] = cell;
        }
    }
    (tree, before, cells)
}

/// doc > table built from `(row, col, row_span, col_span)` tuples, one row node per first row.
fn grid(cells: &[(usize, usize, usize, usize)]) -> (Tree, HashMap<(usize, usize), NodeId>) {
    let mut tree = Tree::new(NodeData::new(Role::RootWebArea));
    let table = tree.append(tree.root_id(), NodeData::new(Role::Table));
    let mut rows = HashMap::new();
    let mut ids = HashMap::new();
    for &(row, col, row_span, col_span) in cells {
        let row_id = *rows
            .entry(row)
            .or_insert_with(|| tree.append(table, NodeData::new(Role::Row)));
        let coords = CellCoords {
            row,
            col,
            row_span,
            col_span,
        };
        let cell = tree.append(row_id, NodeData::new(Role::Cell).with_coords(coords));
        tree.append(cell, NodeData::new(Role::StaticText).with_name(format!("{row},{col}")));
        ids.insert((row, col), cell);
    }
    (tree, ids)
}

/// Runs `steps` in order, checking each outcome: `Some(cell)` for a move onto that cell, `None`
/// for a failure announcing `key`.
fn walk(
    tree: &Tree,
    ids: &HashMap<(usize, usize), NodeId>,
    from: (usize, usize),
    steps: &[(&str, Result<(usize, usize), &'static str>)],
) {
    let text = tree.node(ids[&from]).unwrap().first_child().unwrap().id();
    let mut session = session_at(tree, text);
    let mut host = Recorder::default();
    for (command, expected) in steps {
        let outcome = session.handle(tree, command, &mut host);
        let expected = match expected {
            Ok(cell) => Outcome::Moved(at(tree, ids[cell])),
            Err(key) => Outcome::Unchanged { key: Some(*key) },
        };
        assert_eq!(outcome, expected, "{command}");
    }
}

#[test]
fn test_heading_level_search() {
    let (tree, [a, _, c]) = headings();
    let mut session = session_at(&tree, a);
    let mut host = Recorder::default();

    let outcome = session.handle(&tree, "nextHeading2", &mut host);
    assert_eq!(outcome, Outcome::Moved(at(&tree, c)));
    assert_eq!(session.current(), Some(&at(&tree, c)));
    assert_eq!(host.presented, vec![(at(&tree, c), OutputEvent::Navigate)]);

    let again = session.handle(&tree, "nextHeading2", &mut host);
    assert_eq!(
        again,
        Outcome::Unchanged {
            key: Some("no_next_heading_2")
        }
    );
    assert_eq!(host.announced, vec!["no_next_heading_2"]);
    assert_eq!(session.current(), Some(&at(&tree, c)), "failure keeps the position");
    assert_eq!(host.presented.len(), 1, "failure presents nothing");

    let back = session.handle(&tree, "previousHeading", &mut host);
    assert_eq!(back, Outcome::Moved(at(&tree, a)));
}

#[test]
fn test_search_stays_in_document() {
    let mut tree = Tree::new(NodeData::new(Role::Desktop));
    let first = tree.append(tree.root_id(), NodeData::new(Role::RootWebArea));
    let only = tree.append(first, NodeData::new(Role::Heading).with_level(1));
    let second = tree.append(tree.root_id(), NodeData::new(Role::RootWebArea));
    tree.append(second, NodeData::new(Role::Heading).with_level(1));

    let mut session = session_at(&tree, only);
    let mut host = Recorder::default();
    assert_eq!(
        session.handle(&tree, "nextHeading", &mut host),
        Outcome::Unchanged {
            key: Some("no_next_heading")
        },
        "headings of other documents are out of reach"
    );
}

#[test]
fn test_table_rows_and_columns() {
    let (tree, _, cells) = table();
    let text = tree.node(cells[0]).unwrap().first_child().unwrap().id();
    let mut session = session_at(&tree, text);
    let mut host = Recorder::default();

    assert_eq!(
        session.handle(&tree, "nextRow", &mut host),
        Outcome::Moved(at(&tree, cells[2]))
    );
    assert_eq!(
        session.handle(&tree, "nextRow", &mut host),
        Outcome::Unchanged {
            key: Some("no_cell_below")
        }
    );
    assert_eq!(host.announced, vec!["no_cell_below"]);

    assert_eq!(
        session.handle(&tree, "nextCol", &mut host),
        Outcome::Moved(at(&tree, cells[3]))
    );
    assert_eq!(
        session.handle(&tree, "previousRow", &mut host),
        Outcome::Moved(at(&tree, cells[1]))
    );
    assert_eq!(
        session.handle(&tree, "goToRowFirstCell", &mut host),
        Outcome::Moved(at(&tree, cells[0]))
    );
    assert_eq!(
        session.handle(&tree, "previousCol", &mut host),
        Outcome::Unchanged {
            key: Some("no_cell_left")
        }
    );
    assert_eq!(
        session.handle(&tree, "goToColLastCell", &mut host),
        Outcome::Moved(at(&tree, cells[2]))
    );
}

#[test]
fn test_first_and_last_cell() {
    let (tree, before, cells) = table();
    let mut session = session_at(&tree, cells[0]);
    let mut host = Recorder::default();

    assert_eq!(
        session.handle(&tree, "goToLastCell", &mut host),
        Outcome::Moved(at(&tree, cells[3]))
    );
    assert_eq!(
        session.handle(&tree, "goToFirstCell", &mut host),
        Outcome::Moved(at(&tree, cells[0]))
    );

    let mut outside = session_at(&tree, before);
    assert_eq!(
        outside.handle(&tree, "goToFirstCell", &mut host),
        Outcome::Unchanged { key: None }
    );
    assert_eq!(
        outside.handle(&tree, "goToLastCell", &mut host),
        Outcome::Unchanged { key: None }
    );
    assert!(host.announced.is_empty(), "outside a table the first and last cell stay put");
    assert_eq!(outside.current(), Some(&at(&tree, before)));
    assert_eq!(
        outside.handle(&tree, "nextRow", &mut host),
        Outcome::Unchanged {
            key: Some("no_cell_below")
        }
    );
}

#[test]
fn test_boundary_move_re_presents() {
    let (tree, [_, _, c]) = headings();
    let mut session = session_at(&tree, c);
    let mut host = Recorder::default();

    let outcome = session.execute(&tree, Command::Move(Unit::Node, Direction::Forward), &mut host);
    assert_eq!(outcome, Outcome::Unchanged { key: None });
    assert_eq!(
        host.presented,
        vec![(at(&tree, c), OutputEvent::Navigate)],
        "the unchanged range is presented again"
    );
    assert!(host.announced.is_empty());
}

#[test]
fn test_jumps() {
    let (tree, [a, _, c]) = headings();
    let mut session = session_at(&tree, c);
    let mut host = Recorder::default();
    assert_eq!(
        session.handle(&tree, "jumpToTop", &mut host),
        Outcome::Moved(at(&tree, a))
    );
    assert_eq!(
        session.handle(&tree, "jumpToBottom", &mut host),
        Outcome::Moved(at(&tree, c))
    );
}

#[test]
fn test_stale_position_recovers_to_focus() {
    let mut tree = Tree::new(NodeData::new(Role::RootWebArea));
    let p = tree.append(tree.root_id(), NodeData::new(Role::Paragraph));
    let text = tree.append(p, NodeData::new(Role::StaticText).with_name("gone"));
    let button = tree.append(tree.root_id(), NodeData::new(Role::Button).with_name("Go"));
    let after = tree.append(tree.root_id(), NodeData::new(Role::StaticText).with_name("after"));

    let mut session = session_at(&tree, text);
    session.on_focus_changed(&tree, Some(button));
    assert_eq!(session.current(), Some(&at(&tree, text)), "focus does not move a set position");

    tree.detach(p);
    let mut host = Recorder::default();
    let outcome = session.handle(&tree, "nextObject", &mut host);
    assert_eq!(
        outcome,
        Outcome::Moved(at(&tree, after)),
        "the move proceeds from the recovered focus"
    );
}

#[test]
fn test_stale_position_without_focus_is_cleared() {
    let mut tree = Tree::new(NodeData::new(Role::RootWebArea));
    let p = tree.append(tree.root_id(), NodeData::new(Role::Paragraph));
    let text = tree.append(p, NodeData::new(Role::StaticText).with_name("gone"));
    let mut session = session_at(&tree, text);

    tree.detach(p);
    session.validate(&tree);
    assert_eq!(session.current(), None);

    let mut host = Recorder::default();
    assert_eq!(session.handle(&tree, "nextObject", &mut host), Outcome::Unhandled);
    assert!(host.presented.is_empty());
}

#[test]
fn test_focus_seeds_missing_position() {
    let (tree, [_, b, _]) = headings();
    let mut session = Session::new();
    let mut host = Recorder::default();
    assert_eq!(session.handle(&tree, "nextObject", &mut host), Outcome::Unhandled);

    session.on_focus_changed(&tree, Some(b));
    assert_eq!(session.focus(), Some(b));
    assert_eq!(session.current(), Some(&at(&tree, b)));
}

#[test]
fn test_force_click_on_inline_text_box_activates_parent() {
    let mut tree = Tree::new(NodeData::new(Role::RootWebArea));
    let link = tree.append(tree.root_id(), NodeData::new(Role::Link).with_name("docs"));
    let text = tree.append(link, NodeData::new(Role::StaticText).with_name("docs"));
    let inline = tree.append(text, NodeData::new(Role::InlineTextBox).with_name("docs"));

    let mut host = Recorder::default();
    let mut session = session_at(&tree, inline);
    let outcome = session.handle(&tree, "forceClickOnCurrentItem", &mut host);
    assert_eq!(outcome, Outcome::Unchanged { key: None });
    assert_eq!(host.activated, vec![text]);

    let mut on_link = session_at(&tree, link);
    on_link.handle(&tree, "forceClickOnCurrentItem", &mut host);
    assert_eq!(host.activated, vec![text, link]);
}

#[test]
fn test_unknown_command_is_unhandled() {
    let (tree, [a, _, _]) = headings();
    let mut session = session_at(&tree, a);
    let mut host = Recorder::default();
    assert_eq!(session.handle(&tree, "scrollLeft", &mut host), Outcome::Unhandled);
    assert!(host.announced.is_empty());
    assert!(host.presented.is_empty());
}

#[test]
fn test_error_outcomes() {
    assert_eq!(
        Outcome::from(NavError::NotFound { key: "no_next_link" }),
        Outcome::Unchanged {
            key: Some("no_next_link")
        }
    );
    assert_eq!(
        Outcome::from(NavError::InvalidPosition),
        Outcome::Unchanged { key: None }
    );
    assert_eq!(
        Outcome::from(NavError::Unhandled {
            command: "x".to_string()
        }),
        Outcome::Unhandled
    );
}

#[test]
fn test_continuous_reading_runs_to_end() {
    let mut tree = Tree::new(NodeData::new(Role::RootWebArea));
    let doc = tree.root_id();
    let leaves: Vec<_> = ["one", "two", "three", "four"]
        .into_iter()
        .map(|name| tree.append(doc, NodeData::new(Role::StaticText).with_name(name)))
        .collect();
    let mut session = session_at(&tree, leaves[1]);
    let mut host = Recorder::default();

    assert_eq!(
        session.handle(&tree, "readFromHere", &mut host),
        Outcome::Unchanged { key: None }
    );
    assert!(session.is_reading());
    assert_eq!(host.presented, vec![(at(&tree, leaves[1]), OutputEvent::Read)]);

    assert_eq!(
        session.on_output_complete(&tree, &mut host),
        ReadStep::Continued(at(&tree, leaves[2]))
    );
    assert_eq!(
        session.on_output_complete(&tree, &mut host),
        ReadStep::Continued(at(&tree, leaves[3]))
    );
    assert_eq!(session.on_output_complete(&tree, &mut host), ReadStep::Finished);
    assert!(!session.is_reading());
    assert_eq!(session.on_output_complete(&tree, &mut host), ReadStep::Idle);
    assert!(host.presented.iter().all(|(_, event)| *event == OutputEvent::Read));
    assert_eq!(host.presented.len(), 3);
}

#[test]
fn test_stop_speech_halts_reading() {
    let (tree, [a, _, _]) = headings();
    let mut session = session_at(&tree, a);
    let mut host = Recorder::default();
    session.handle(&tree, "readFromHere", &mut host);
    assert_eq!(
        session.handle(&tree, "stopSpeech", &mut host),
        Outcome::Unchanged { key: None }
    );
    assert_eq!(session.on_output_complete(&tree, &mut host), ReadStep::Idle);
    assert_eq!(session.current(), Some(&at(&tree, a)));

    let mut empty = Session::new();
    assert_eq!(
        empty.handle(&tree, "stopSpeech", &mut host),
        Outcome::Unchanged { key: None },
        "stopping works without a position"
    );
}

#[test]
fn test_focus_change_stops_reading() {
    let (tree, [a, b, _]) = headings();
    let mut session = session_at(&tree, a);
    let mut host = Recorder::default();
    session.handle(&tree, "readFromHere", &mut host);
    session.on_focus_changed(&tree, Some(b));
    assert!(!session.is_reading());
    assert_eq!(session.on_output_complete(&tree, &mut host), ReadStep::Idle);
}

#[test]
fn test_reading_stops_on_wrap_to_document() {
    let mut tree = Tree::new(NodeData::new(Role::Desktop));
    let button = tree.append(tree.root_id(), NodeData::new(Role::Button).with_name("OK"));
    tree.append(tree.root_id(), NodeData::new(Role::RootWebArea).with_name("page"));

    let mut session = session_at(&tree, button);
    let mut host = Recorder::default();
    session.handle(&tree, "readFromHere", &mut host);
    assert_eq!(session.on_output_complete(&tree, &mut host), ReadStep::Finished);
    assert_eq!(session.current(), Some(&at(&tree, button)));
    assert_eq!(host.presented.len(), 1);
}

#[test]
fn test_table_moves_around_row_spanning_cell() {
    // (0,0) spans both rows; (1,1) lives in the second row node.
    let (tree, ids) = grid(&[(0, 0, 2, 1), (0, 1, 1, 1), (1, 1, 1, 1)]);
    walk(
        &tree,
        &ids,
        (1, 1),
        &[
            ("previousCol", Ok((0, 0))),
            ("nextCol", Ok((0, 1))),
            ("nextRow", Ok((1, 1))),
            ("goToRowFirstCell", Ok((0, 0))),
            ("nextRow", Err("no_cell_below")),
            ("goToRowLastCell", Ok((0, 1))),
            ("goToColLastCell", Ok((1, 1))),
            ("goToColFirstCell", Ok((0, 1))),
            ("previousRow", Err("no_cell_above")),
            ("goToLastCell", Ok((1, 1))),
            ("goToFirstCell", Ok((0, 0))),
        ],
    );
}

#[test]
fn test_table_moves_across_missing_cells() {
    let cells: Vec<_> = (0..3)
        .flat_map(|r| (0..3).map(move |c| (r, c, 1, 1)))
        .filter(|c| (c.0, c.1) != (1, 1))
        .collect();
    let (tree, ids) = grid(&cells);
    walk(
        &tree,
        &ids,
        (1, 0),
        &[
            ("nextCol", Ok((1, 2))),
            ("previousCol", Ok((1, 0))),
            ("nextRow", Ok((2, 0))),
            ("goToRowLastCell", Ok((2, 2))),
        ],
    );
    walk(
        &tree,
        &ids,
        (0, 1),
        &[("nextRow", Ok((2, 1))), ("previousRow", Ok((0, 1)))],
    );

    // With the rest of its row missing, a cell moves right into the row above.
    let (tree, ids) = grid(&[(0, 0, 1, 1), (0, 1, 1, 1), (1, 0, 1, 1)]);
    walk(
        &tree,
        &ids,
        (1, 0),
        &[("nextCol", Ok((0, 1))), ("nextCol", Err("no_cell_right"))],
    );
}

#[test]
fn test_table_moves_around_merged_cell() {
    let (tree, ids) = grid(&[
        (0, 0, 1, 2),
        (0, 2, 1, 1),
        (1, 0, 1, 1),
        (1, 1, 1, 1),
        (1, 2, 1, 1),
    ]);
    walk(
        &tree,
        &ids,
        (1, 1),
        &[
            ("previousRow", Ok((0, 0))),
            ("nextRow", Ok((1, 0))),
            ("previousRow", Ok((0, 0))),
            ("nextCol", Ok((0, 2))),
            ("previousCol", Ok((0, 0))),
            ("goToRowLastCell", Ok((0, 2))),
            ("goToColLastCell", Ok((1, 2))),
            ("goToRowFirstCell", Ok((1, 0))),
        ],
    );
}

#[test]
fn test_edge_moves_from_the_edge_stay_silent() {
    let (tree, _, cells) = table();
    let mut host = Recorder::default();
    let cases = [
        (cells[1], "goToColFirstCell"),
        (cells[2], "goToRowFirstCell"),
        (cells[1], "goToRowLastCell"),
        (cells[2], "goToColLastCell"),
    ];
    for (cell, command) in cases {
        let mut session = session_at(&tree, cell);
        assert_eq!(
            session.handle(&tree, command, &mut host),
            Outcome::Unchanged { key: None },
            "{command}"
        );
        assert_eq!(session.current(), Some(&at(&tree, cell)));
    }
    assert!(host.announced.is_empty());
    assert_eq!(host.presented.len(), 4, "the cell is presented again");
}

#[test]
fn test_predicate_search_visits_nested_matches() {
    // doc > [comboBox > textField "inner", textField "after"]
    let mut tree = Tree::new(NodeData::new(Role::RootWebArea));
    let doc = tree.root_id();
    let combo = tree.append(doc, NodeData::new(Role::ComboBox).with_name("combo"));
    let inner = tree.append(combo, NodeData::new(Role::TextField).with_name("inner"));
    let after = tree.append(doc, NodeData::new(Role::TextField).with_name("after"));
    let mut host = Recorder::default();

    let mut session = session_at(&tree, combo);
    assert_eq!(
        session.handle(&tree, "nextFormField", &mut host),
        Outcome::Moved(at(&tree, inner))
    );
    assert_eq!(
        session.handle(&tree, "nextFormField", &mut host),
        Outcome::Moved(at(&tree, after))
    );
    assert_eq!(
        session.handle(&tree, "previousFormField", &mut host),
        Outcome::Moved(at(&tree, inner))
    );

    let mut objects = session_at(&tree, combo);
    assert_eq!(
        objects.handle(&tree, "nextObject", &mut host),
        Outcome::Moved(at(&tree, after)),
        "object moves treat the combo box as one unit"
    );
}

/// desktop > [document "Guide" (guide.md) > link > text > inline box,
///            document "" (notes.md) > text "n",
///            window "Settings" > button "OK"]
fn desktop() -> (Tree, [NodeId; 4]) {
    let mut tree = Tree::new(NodeData::new(Role::Desktop));
    let top = tree.root_id();
    let guide = tree.append(
        top,
        NodeData::new(Role::RootWebArea).with_name("Guide").with_url("guide.md"),
    );
    let link = tree.append(guide, NodeData::new(Role::Link).with_name("docs").with_url("docs.md"));
    let text = tree.append(link, NodeData::new(Role::StaticText).with_name("docs"));
    let inline = tree.append(text, NodeData::new(Role::InlineTextBox).with_name("docs"));
    let notes = tree.append(top, NodeData::new(Role::RootWebArea).with_url("notes.md"));
    let n = tree.append(notes, NodeData::new(Role::StaticText).with_name("n"));
    let window = tree.append(top, NodeData::new(Role::Window).with_name("Settings"));
    let ok = tree.append(window, NodeData::new(Role::Button).with_name("OK"));
    (tree, [text, inline, n, ok])
}

#[test]
fn test_read_title_and_url() {
    let (tree, [_, inline, n, ok]) = desktop();
    let mut host = Recorder::default();

    let mut session = session_at(&tree, inline);
    for command in ["readCurrentTitle", "readCurrentURL"] {
        assert_eq!(
            session.handle(&tree, command, &mut host),
            Outcome::Unchanged { key: None }
        );
    }
    assert_eq!(host.spoken, vec!["Guide", "guide.md"], "the document, not the link");
    assert_eq!(session.current(), Some(&at(&tree, inline)));

    let mut untitled = session_at(&tree, n);
    untitled.handle(&tree, "readCurrentTitle", &mut host);
    assert_eq!(host.spoken[2], "notes.md", "an unnamed document is titled by its address");

    let mut dialog = session_at(&tree, ok);
    dialog.handle(&tree, "readCurrentTitle", &mut host);
    dialog.handle(&tree, "readCurrentURL", &mut host);
    assert_eq!(host.spoken[3..], ["Settings"], "windows have a title but no address");
    assert!(host.presented.is_empty());
}

#[test]
fn test_context_menu_targets_like_default_action() {
    let (tree, [text, inline, _, ok]) = desktop();
    let mut host = Recorder::default();
    let mut session = session_at(&tree, inline);
    assert_eq!(
        session.handle(&tree, "contextMenu", &mut host),
        Outcome::Unchanged { key: None }
    );
    session_at(&tree, ok).handle(&tree, "contextMenu", &mut host);
    assert_eq!(host.menus, vec![text, ok]);
    assert!(host.activated.is_empty());

    assert_eq!(
        Session::new().handle(&tree, "contextMenu", &mut host),
        Outcome::Unhandled
    );
}
