use crate::api::Services;
use crate::providers::use_observable;
use crate::state::TaskBoard;
use crate::types::{Task, TaskDraft, TaskPatch, due_date_input_value, due_date_to_iso};
use crate::views::auth::ErrorBanner;
use crate::views::shared::format_due_date;
use dioxus::prelude::*;
use tracing::warn;

#[component]
pub fn DashboardView() -> Element {
    let services = use_context::<Services>();
    let board = use_hook(|| TaskBoard::new(services.tasks.clone()));
    use_context_provider(|| board.clone());
    let state = use_observable(board.state());
    let mut show_form = use_signal(|| false);
    let mut editing = use_signal(|| Option::<Task>::None);

    use_hook(|| {
        let board = board.clone();
        spawn(async move {
            board.refresh().await;
        })
    });

    let snapshot = state();
    let count_label = snapshot.count_label();

    rsx! {
        div { class: "dashboard",
            div { class: "dashboard-toolbar",
                div {
                    h2 { class: "dashboard-title", "My Tasks" }
                    p { class: "text-muted", "{count_label}" }
                }
                button {
                    class: "btn btn-primary",
                    onclick: move |_| {
                        editing.set(None);
                        show_form.set(true);
                    },
                    "Add Task"
                }
            }

            if snapshot.loading && snapshot.tasks.is_empty() {
                div { class: "spinner-wrap", div { class: "spinner" } }
            } else if snapshot.tasks.is_empty() {
                EmptyState {
                    on_add: move |_| {
                        editing.set(None);
                        show_form.set(true);
                    },
                }
            } else {
                div { class: "task-list",
                    for task in snapshot.tasks.iter() {
                        TaskCard {
                            key: "{task.id}",
                            task: task.clone(),
                            on_edit: move |task: Task| {
                                editing.set(Some(task));
                                show_form.set(true);
                            },
                        }
                    }
                }
            }

            if show_form() {
                div { class: "modal-backdrop",
                    TaskForm {
                        task: editing(),
                        on_close: move |_| {
                            show_form.set(false);
                            editing.set(None);
                        },
                    }
                }
            }
        }
    }
}

#[component]
fn EmptyState(on_add: EventHandler<()>) -> Element {
    rsx! {
        div { class: "empty-state",
            h3 { "No tasks yet" }
            p { class: "text-muted", "Create a task to get started." }
            button { class: "btn btn-primary", onclick: move |_| on_add.call(()), "Add your first task" }
        }
    }
}

#[component]
fn TaskCard(task: Task, on_edit: EventHandler<Task>) -> Element {
    let board = use_context::<TaskBoard>();

    let toggle_board = board.clone();
    let toggle_id = task.id.clone();
    let on_toggle = move |_: FormEvent| {
        let board = toggle_board.clone();
        let id = toggle_id.clone();
        spawn(async move {
            if let Err(err) = board.toggle(&id).await {
                warn!(task_id = %id, "toggle failed: {err}");
            }
        });
    };

    let delete_id = task.id.clone();
    let on_delete = move |_: MouseEvent| {
        let board = board.clone();
        let id = delete_id.clone();
        spawn(async move {
            if let Err(err) = board.delete(&id).await {
                warn!(task_id = %id, "delete failed: {err}");
            }
        });
    };

    let edit_payload = task.clone();
    let title_class = if task.completed {
        "task-title completed"
    } else {
        "task-title"
    };
    let due = task.due_date.as_deref().and_then(format_due_date);

    rsx! {
        div { class: "task-card",
            input {
                class: "task-checkbox",
                r#type: "checkbox",
                checked: task.completed,
                aria_label: "Mark task complete",
                onchange: on_toggle,
            }
            div { class: "task-body",
                h3 { class: title_class, "{task.title}" }
                if let Some(description) = task.description.as_deref().filter(|d| !d.is_empty()) {
                    p { class: "task-description", "{description}" }
                }
                if let Some(due) = due {
                    span { class: "due-pill", "Due {due}" }
                }
            }
            div { class: "task-actions",
                button {
                    class: "icon-btn",
                    aria_label: "Edit task",
                    onclick: move |_| on_edit.call(edit_payload.clone()),
                    "Edit"
                }
                button {
                    class: "icon-btn danger",
                    aria_label: "Delete task",
                    onclick: on_delete,
                    "Delete"
                }
            }
        }
    }
}

/// Create form, or edit form when `task` is set.
#[component]
fn TaskForm(task: Option<Task>, on_close: EventHandler<()>) -> Element {
    let board = use_context::<TaskBoard>();
    let editing_id = task.as_ref().map(|t| t.id.clone());
    let is_edit = editing_id.is_some();

    let mut title = use_signal(|| task.as_ref().map(|t| t.title.clone()).unwrap_or_default());
    let mut description = use_signal(|| {
        task.as_ref()
            .and_then(|t| t.description.clone())
            .unwrap_or_default()
    });
    let mut due_date =
        use_signal(|| due_date_input_value(task.as_ref().and_then(|t| t.due_date.as_deref())));
    let mut error = use_signal(|| Option::<String>::None);
    let mut submitting = use_signal(|| false);

    let onsubmit = move |ev: FormEvent| {
        ev.prevent_default();
        if submitting() {
            return;
        }
        let draft = TaskDraft {
            title: title(),
            description: description(),
            due_date: due_date_to_iso(&due_date()),
        };
        if draft.title.trim().is_empty() {
            error.set(Some("Title is required".to_string()));
            return;
        }

        let board = board.clone();
        let editing_id = editing_id.clone();
        error.set(None);
        submitting.set(true);
        spawn(async move {
            let result = match editing_id {
                Some(id) => board.update(&id, &TaskPatch::from(draft)).await.map(drop),
                None => board.create(&draft).await.map(drop),
            };
            match result {
                Ok(()) => on_close.call(()),
                Err(err) => {
                    error.set(Some(err.to_string()));
                    submitting.set(false);
                }
            }
        });
    };

    let submit_label = match (is_edit, submitting()) {
        (false, true) => "Creating...",
        (true, true) => "Updating...",
        (false, false) => "Create Task",
        (true, false) => "Update Task",
    };

    rsx! {
        div { class: "modal",
            h2 { class: "modal-title", if is_edit { "Edit Task" } else { "New Task" } }
            ErrorBanner { error: error() }
            form { class: "task-form", onsubmit: onsubmit,
                label { r#for: "task-title", "Title" }
                input {
                    id: "task-title", r#type: "text", required: true, placeholder: "What needs doing?",
                    value: "{title}", oninput: move |ev| title.set(ev.value()),
                }
                label { r#for: "task-description", "Description" }
                textarea {
                    id: "task-description", rows: "3", placeholder: "Optional details",
                    value: "{description}", oninput: move |ev| description.set(ev.value()),
                }
                label { r#for: "task-due", "Due date" }
                input {
                    id: "task-due", r#type: "date",
                    value: "{due_date}", oninput: move |ev| due_date.set(ev.value()),
                }
                div { class: "form-actions",
                    button {
                        class: "btn btn-secondary", r#type: "button",
                        disabled: submitting(),
                        onclick: move |_| on_close.call(()),
                        "Cancel"
                    }
                    button { class: "btn btn-primary", r#type: "submit", disabled: submitting(), "{submit_label}" }
                }
            }
        }
    }
}
