pub mod supabase;
pub mod youtube;

pub use supabase::{AuthUser, SupabaseClient};
pub use youtube::YoutubeClient;
