use leptos::prelude::*;
use zoom_switch_canvas::{App, init_logging};

fn main() {
	init_logging();
	mount_to_body(App)
}
