// Colonel Blotto solver: combination enumeration, battle outcomes, max-min search.

pub mod game;
pub mod server;
