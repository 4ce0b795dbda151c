//! End-to-end grid scenarios
//!
//! Each test drives a `MarkdownSurface` through messages and checks the
//! resulting document text and selection.

mod common;

use common::*;
use mdgrid::commands::Cmd;
use mdgrid::keymap::{KeyCode, Keystroke, Modifiers};
use mdgrid::messages::TableMsg;
use mdgrid::table::{Alignment, MenuScope, Selection, TableCommand};
use mdgrid::commands::MenuAction;
use mdgrid::cli::{Action, CliArgs};
use clap::Parser;

#[test]
fn test_tab_wraps_within_header_then_to_first_cell() {
    let mut surface = test_surface(AB_TABLE);
    let msg = click_cell(&surface, 0, 0, 0);
    surface.send(0, msg);
    assert_eq!(surface.selection(0), Some(Selection::cell(0, 0)));

    surface.key(0, Keystroke::plain(KeyCode::Tab));
    assert_eq!(surface.selection(0), Some(Selection::cell(0, 1)));

    surface.send(0, TableMsg::LastCell);
    assert_eq!(surface.selection(0), Some(Selection::cell(1, 1)));
    surface.key(0, Keystroke::plain(KeyCode::Tab));
    assert_eq!(surface.selection(0), Some(Selection::cell(0, 0)));

    // Shift+Tab wraps the other way
    surface.key(0, Keystroke::new(KeyCode::Tab, Modifiers::SHIFT));
    assert_eq!(surface.selection(0), Some(Selection::cell(1, 1)));
}

#[test]
fn test_insert_column_right_of_first() {
    let mut surface = test_surface(AB_TABLE);
    surface.send(
        0,
        TableMsg::OpenMenu {
            scope: MenuScope::Column(0),
            x: 4.0,
            y: 4.0,
        },
    );
    surface.send(0, TableMsg::Menu(MenuAction::InsertColumnRight));

    assert_eq!(surface.text(), "| A | Col 2 | B |\n| --- | --- | --- |\n| 1 |  | 2 |");
    assert_eq!(
        table_texts(&surface, 0),
        vec![vec!["A", "Col 2", "B"], vec!["1", "", "2"]]
    );
}

#[test]
fn test_edit_commit_preserves_trailing_blank_lines() {
    let doc = "Intro\n\n| Name | Qty |\n| --- | ---: |\n| apples | 3 |\n| pears | 5 |\n\n\n\n## Next\n";
    let mut surface = test_surface(doc);

    let msg = click_cell(&surface, 0, 1, 0);
    surface.send(0, msg);
    surface.key(0, Keystroke::plain(KeyCode::Enter));
    surface.send(0, TableMsg::EditSelectAll);
    type_text(&mut surface, 0, "updated");
    let cmd = surface.key(0, Keystroke::plain(KeyCode::Enter)).unwrap();

    assert!(matches!(cmd, Cmd::Commit(_)));
    assert_eq!(
        surface.text(),
        "Intro\n\n| Name | Qty |\n| --- | ---: |\n| updated | 3 |\n| pears | 5 |\n\n\n\n## Next\n"
    );

    surface.animation_frame();
    assert_eq!(surface.selection(0), Some(Selection::cell(1, 0)));
}

#[test]
fn test_drag_row_zero_after_row_one() {
    let mut surface = test_surface("| A |\n| --- |\n| zero |\n| one |\n");
    let view = surface.view(0).unwrap();
    let (hx, hy) = view.layout.row_handle_rect(1).unwrap().center();
    let target = view.layout.cell_rect(2, 0).unwrap();
    let drop_y = target.y + target.height * 0.9;

    surface.send(0, pointer_down(hx, hy, 1));
    assert_eq!(surface.capture().captured(), Some(1));
    surface.send(
        0,
        TableMsg::PointerMove {
            x: hx,
            y: drop_y,
            pointer_id: 1,
        },
    );
    let cmd = surface.send(
        0,
        TableMsg::PointerUp {
            x: hx,
            y: drop_y,
            pointer_id: 1,
        },
    );

    assert!(cmd.commit().is_some());
    assert_eq!(surface.capture().captured(), None);
    assert_eq!(surface.text(), "| A |\n| --- |\n| one |\n| zero |\n");

    surface.animation_frame();
    assert_eq!(surface.selection(0), Some(Selection::Row(2)));
}

#[test]
fn test_multiline_cell_round_trips_through_edit() {
    let mut surface = test_surface(AB_TABLE);
    surface.send(0, TableMsg::SelectCell { row: 1, col: 1 });
    surface.send(0, TableMsg::StartEditing);
    surface.key(0, Keystroke::new(KeyCode::Enter, Modifiers::SHIFT));
    type_text(&mut surface, 0, "b|c");
    surface.key(0, Keystroke::plain(KeyCode::Enter));

    assert!(surface.text().ends_with("| 1 | 2<br>b\\|c |"));
    surface.animation_frame();

    // Editing again shows the line break as a real newline
    surface.send(0, TableMsg::StartEditing);
    let draft = surface.state(0).unwrap().editing.as_ref().unwrap();
    assert_eq!(draft.editor.text(), "2\nb|c");
}

#[test]
fn test_escape_leaves_document_untouched() {
    let mut surface = test_surface(AB_TABLE);
    surface.send(0, TableMsg::SelectCell { row: 1, col: 0 });
    surface.key(0, Keystroke::plain(KeyCode::Char('9')));
    surface.key(0, Keystroke::plain(KeyCode::Escape));
    assert_eq!(surface.text(), AB_TABLE);
    assert_eq!(surface.selection(0), Some(Selection::cell(1, 0)));
}

#[test]
fn test_delete_only_column_is_noop() {
    let text = "| Only |\n| --- |\n| x |\n";
    let mut surface = test_surface(text);
    let cmd = surface.send(0, TableMsg::Command(TableCommand::DeleteColumn(0)));
    assert_eq!(cmd, Cmd::Redraw);
    assert_eq!(surface.text(), text);
}

#[test]
fn test_delete_row_from_menu() {
    let mut surface = test_surface("| A |\n| --- |\n| 1 |\n| 2 |\n| 3 |\n");
    surface.send(0, TableMsg::SelectRow(2));
    surface.send(
        0,
        TableMsg::OpenMenu {
            scope: MenuScope::Row(2),
            x: 0.0,
            y: 0.0,
        },
    );
    surface.send(0, TableMsg::Menu(MenuAction::DeleteRow));
    assert_eq!(surface.text(), "| A |\n| --- |\n| 1 |\n| 3 |\n");

    surface.animation_frame();
    assert_eq!(surface.selection(0), Some(Selection::cell(2, 0)));
}

#[test]
fn test_alignment_from_menu() {
    let mut surface = test_surface(AB_TABLE);
    surface.send(
        0,
        TableMsg::OpenMenu {
            scope: MenuScope::Column(1),
            x: 0.0,
            y: 0.0,
        },
    );
    surface.send(0, TableMsg::Menu(MenuAction::AlignCenter));
    assert_eq!(surface.text(), "| A | B |\n| --- | :---: |\n| 1 | 2 |");
}

#[test]
fn test_arrow_out_of_table_hands_off_to_host() {
    let mut surface = test_surface("above\n| A |\n| --- |\n| 1 |\nbelow");
    surface.send(0, TableMsg::SelectCell { row: 0, col: 0 });
    assert_eq!(
        surface.key(0, Keystroke::plain(KeyCode::Up)),
        Some(Cmd::HandOff { line: 0 })
    );
    assert_eq!(surface.focused_table(), None);
    assert_eq!(surface.cursor_line(), 0);
    assert_eq!(surface.selection(0), None);
}

#[test]
fn test_set_cell_command_with_newline_keeps_row_count() {
    let mut surface = test_surface(AB_TABLE);
    let cmd = surface.send(
        0,
        TableMsg::Command(TableCommand::SetCell {
            row: 1,
            col: 0,
            text: "x\ny".to_string(),
        }),
    );

    assert!(cmd.commit().is_some());
    assert_eq!(surface.text(), "| A | B |\n| --- | --- |\n| x<br>y | 2 |");
    assert_eq!(surface.widgets()[0].data.row_count(), 1);
}

#[test]
fn test_cli_rename_with_newline_stays_in_header() {
    let args = CliArgs::try_parse_from(["mdgrid", "rename", "notes.md", "1", "first\nsecond"])
        .unwrap();
    let Action::Edit { command, .. } = args.into_action().unwrap() else {
        panic!("expected edit");
    };

    let mut surface = test_surface(AB_TABLE);
    surface.send(0, TableMsg::Command(command));
    assert_eq!(
        surface.text(),
        "| A | first<br>second |\n| --- | --- |\n| 1 | 2 |"
    );
    assert_eq!(
        table_texts(&surface, 0),
        vec![vec!["A", "first<br>second"], vec!["1", "2"]]
    );
}

#[test]
fn test_commit_leaves_adjacent_paragraph_alone() {
    let doc = "| A | B |\n| --- | --- |\n| 1 | 2 |\nSome paragraph text\n";
    let mut surface = test_surface(doc);
    assert_eq!(surface.widgets()[0].line_range, 0..3);

    surface.send(
        0,
        TableMsg::Command(TableCommand::SetAlignment {
            col: 0,
            alignment: Alignment::Left,
        }),
    );
    assert_eq!(
        surface.text(),
        "| A | B |\n| :--- | --- |\n| 1 | 2 |\nSome paragraph text\n"
    );
    assert_eq!(surface.widgets()[0].data.row_count(), 1);
}
