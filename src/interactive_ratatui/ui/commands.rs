use crate::interactive_ratatui::domain::models::FetchRequest;

#[derive(Clone, Debug)]
pub enum Command {
    None,
    Fetch(FetchRequest),
    ScheduleLoadOlder { generation: u64, delay_ms: u64 },
    ClearMessage,
    ScheduleClearMessage(u64), // delay in milliseconds
}
