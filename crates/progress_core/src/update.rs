use crate::{DetailKey, DetailMsg, DetailState, Effect, ListMsg, ListState, LoadError, LoadErrorKind};

const LIST_FAILED: &str = "Failed to fetch progress data";
const DETAIL_FAILED: &str = "Failed to fetch progress details";
const DETAIL_NOT_FOUND: &str = "Progress data not found for this file";

/// Pure update function for the collection views.
pub fn update_list(mut state: ListState, msg: ListMsg) -> (ListState, Vec<Effect>) {
    let effects = match msg {
        ListMsg::Loaded {
            generation,
            records,
            received_at,
        } => {
            if generation != state.generation() {
                return (state, Vec::new());
            }
            state.replace_records(records, received_at);
            Vec::new()
        }
        ListMsg::LoadFailed { generation, error } => {
            if generation != state.generation() {
                return (state, Vec::new());
            }
            if state.record_failure(&error, LIST_FAILED.to_string()) {
                vec![notify(LIST_FAILED)]
            } else {
                Vec::new()
            }
        }
        ListMsg::WatchStarted { generation } => {
            state.begin_generation(generation);
            Vec::new()
        }
        ListMsg::SearchChanged(search) => {
            state.set_search(search);
            Vec::new()
        }
        ListMsg::FilterChanged(filter) => {
            state.set_filter(filter);
            Vec::new()
        }
        ListMsg::PageChanged(page) => {
            state.set_page(page);
            Vec::new()
        }
        ListMsg::ErrorDismissed => {
            state.dismiss_error();
            Vec::new()
        }
        ListMsg::RefreshClicked => vec![Effect::RefreshList],
        ListMsg::RecordOpened { filename } => {
            let key = state
                .records()
                .iter()
                .find(|record| record.filename == filename)
                .map(|record| record.detail_key());
            match key {
                Some(mut key) => {
                    if key.client_key.is_empty() {
                        key.client_key = state.client_key().to_string();
                    }
                    vec![Effect::OpenDetail(key)]
                }
                None => vec![Effect::OpenDetail(DetailKey::new(
                    state.client_key(),
                    filename,
                ))],
            }
        }
        ListMsg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Pure update function for the detail view.
pub fn update_detail(mut state: DetailState, msg: DetailMsg) -> (DetailState, Vec<Effect>) {
    let effects = match msg {
        DetailMsg::Loaded {
            generation,
            record,
            received_at,
        } => {
            if generation != state.generation() {
                return (state, Vec::new());
            }
            state.replace_record(record, received_at);
            Vec::new()
        }
        DetailMsg::LoadFailed { generation, error } => {
            if generation != state.generation() {
                return (state, Vec::new());
            }
            let message = detail_error_message(&error);
            if state.record_failure(&error, message.to_string()) {
                vec![notify(message)]
            } else {
                Vec::new()
            }
        }
        DetailMsg::IdentityChanged { generation, key } => {
            // Same identity: keep the running loop and the expansion choices.
            if key == *state.key() {
                return (state, Vec::new());
            }
            state.reset_identity(generation, key.clone());
            vec![Effect::WatchDetail { generation, key }]
        }
        DetailMsg::GroupToggled { kind, index } => {
            state.toggle_group(kind, index);
            Vec::new()
        }
        DetailMsg::ErrorDismissed => {
            state.dismiss_error();
            Vec::new()
        }
        DetailMsg::RefreshClicked => vec![Effect::RefreshDetail],
        DetailMsg::BackClicked => vec![Effect::CloseDetail],
        DetailMsg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn detail_error_message(error: &LoadError) -> &'static str {
    match error.kind {
        LoadErrorKind::NotFound => DETAIL_NOT_FOUND,
        LoadErrorKind::Transport | LoadErrorKind::Decode => DETAIL_FAILED,
    }
}

fn notify(message: &str) -> Effect {
    Effect::Notify {
        title: "Error".to_string(),
        message: message.to_string(),
    }
}
