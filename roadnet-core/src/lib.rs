pub mod error;
pub mod fetch;
pub mod filter;
pub mod label;
pub mod layout;
pub mod model;
pub mod report;
pub mod store;
pub mod validate;
pub mod weight;

pub use error::NetworkError;
pub use model::{Edge, NetworkDocument, Node};
pub use roadnet_provider as provider;

const BANNER: &str = r#"
                    _            _
 _ __ ___   __ _  __| |_ __   ___| |_
| '__/ _ \ / _` |/ _` | '_ \ / _ \ __|
| | | (_) | (_| | (_| | | | |  __/ |_
|_|  \___/ \__,_|\__,_|_| |_|\___|\__|
"#;

pub fn print_banner() {
    println!("{}", BANNER);
    println!("  road network preparation v{}\n", env!("CARGO_PKG_VERSION"));
}
