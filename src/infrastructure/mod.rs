pub mod http;
pub mod sqlite;
pub mod supabase;
