pub mod navbar;
pub mod reader;
pub mod sidebar;

pub use navbar::NavBarPane;
pub use reader::ReaderPane;
pub use sidebar::SidebarPane;
