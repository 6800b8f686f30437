mod footer;
mod scene_list;
mod status_bar;
mod tab_bar;

pub use footer::FooterWidget;
pub use scene_list::SceneListWidget;
pub use status_bar::StatusBarWidget;
pub use tab_bar::TabBarWidget;
