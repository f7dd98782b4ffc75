use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent, Window,
};

use super::render;
use super::state::ForceGraphState;
use super::types::GraphData;
use crate::config::{DemoConfig, THRESHOLD_OPTIONS, option_value, parse_threshold};
use crate::switching::{
	ActiveRenderingType, GraphEvent, RenderingTypeChanged, SwitchOrchestrator, Threshold,
};

type Shared<T> = Rc<RefCell<Option<T>>>;

/// Pointer travel below which a press on a node counts as a click.
const CLICK_SLOP: f64 = 3.0;

/// Routes a host event into the orchestrator.
fn dispatch(state: &Shared<ForceGraphState>, switch: &Shared<SwitchOrchestrator>, event: GraphEvent) {
	if let (Some(graph), Some(switch)) = (state.borrow_mut().as_mut(), switch.borrow_mut().as_mut()) {
		switch.handle_event(graph, event);
	}
}

fn window_size(window: &Window) -> (f64, f64) {
	(
		window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0),
		window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0),
	)
}

fn local_position(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((ev.client_x() as f64 - rect.left(), ev.client_y() as f64 - rect.top()))
}

fn hide_later(set_popup: WriteSignal<Option<String>>) {
	let Some(window) = web_sys::window() else {
		return;
	};
	let cb = Closure::once_into_js(move || set_popup.set(None));
	let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), 3000);
}

#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(optional)] config: DemoConfig,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let threshold_ref = NodeRef::<leptos::html::Select>::new();
	let state: Shared<ForceGraphState> = Rc::new(RefCell::new(None));
	let switch: Shared<SwitchOrchestrator> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, switch_init, animate_init, resize_cb_init) =
		(state.clone(), switch.clone(), animate.clone(), resize_cb.clone());

	let (zoom_percent, set_zoom_percent) = signal(100u32);
	let (rendering_type, set_rendering_type) = signal(ActiveRenderingType::Unknown);
	let (popup, set_popup) = signal(None::<String>);
	let (counts, set_counts) = signal((0usize, 0usize));
	let initial_threshold = config.threshold().unwrap_or_else(|err| {
		warn!("falling back to default threshold: {err}");
		Threshold::default()
	});
	let selected = option_value(initial_threshold).unwrap_or("0.5");

	Effect::new(move |_| {
		let graph_data = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		// Reload: the previous graph's switch must not outlive it.
		if let Some(previous) = switch_init.borrow_mut().as_mut() {
			previous.dispose();
		}
		let mut graph = ForceGraphState::new(&graph_data, w, h);
		let mut orchestrator = SwitchOrchestrator::new(initial_threshold, config.style_provider());
		orchestrator.set_rendering_type_listener(move |change: &RenderingTypeChanged| {
			set_rendering_type.set(ActiveRenderingType::Known(change.mode));
			set_popup.set(Some(change.message()));
			hide_later(set_popup);
		});
		if let Err(err) = orchestrator.attach(&mut graph) {
			warn!("could not attach renderer switch: {err}");
		}
		set_counts.set(graph.counts());
		set_zoom_percent.set((graph.transform.k * 100.0).floor() as u32);
		*state_init.borrow_mut() = Some(graph);
		*switch_init.borrow_mut() = Some(orchestrator);

		if animate_init.borrow().is_some() {
			return;
		}
		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("canvas has no 2d context");
			return;
		};

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = window_size(&win);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				if s.animation_running {
					s.tick(0.016);
				}
				render::render(s, &ctx);
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			if let Some(idx) = s.node_at_position(x, y) {
				s.drag.active = true;
				s.drag.node_idx = Some(idx);
				s.drag.start_x = x;
				s.drag.start_y = y;
				s.graph.visit_nodes(|node| {
					if node.index() == idx {
						s.drag.node_start_x = node.x();
						s.drag.node_start_y = node.y();
					}
				});
			} else {
				s.pan.active = true;
				s.pan.start_x = x;
				s.pan.start_y = y;
				s.pan.transform_start_x = s.transform.x;
				s.pan.transform_start_y = s.transform.y;
			}
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if !s.drag.active {
				let hovered = s.node_at_position(x, y).and_then(|idx| s.item_at(idx));
				s.set_hover(hovered);
			}

			if s.drag.active {
				if let Some(idx) = s.drag.node_idx {
					let (dx, dy) = (
						(x - s.drag.start_x) / s.transform.k,
						(y - s.drag.start_y) / s.transform.k,
					);
					let (nx, ny) = (
						s.drag.node_start_x + dx as f32,
						s.drag.node_start_y + dy as f32,
					);
					s.graph.visit_nodes_mut(|node| {
						if node.index() == idx {
							node.data.x = nx;
							node.data.y = ny;
							node.data.is_anchor = true;
						}
					});
				}
			} else if s.pan.active {
				s.transform.x = s.pan.transform_start_x + (x - s.pan.start_x);
				s.transform.y = s.pan.transform_start_y + (y - s.pan.start_y);
			}
		}
	};

	let (state_mu, switch_mu) = (state.clone(), switch.clone());
	let on_mouseup = move |ev: MouseEvent| {
		let position = local_position(canvas_ref, &ev);
		let toggled = {
			let mut guard = state_mu.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			let clicked = match (s.drag.node_idx, position) {
				(Some(idx), Some((x, y)))
					if (x - s.drag.start_x).hypot(y - s.drag.start_y) < CLICK_SLOP =>
				{
					s.item_at(idx)
				}
				_ => None,
			};
			s.drag.active = false;
			s.drag.node_idx = None;
			s.pan.active = false;
			clicked.filter(|&item| s.toggle_collapsed(item))
		};
		if let Some(group) = toggled {
			dispatch(&state_mu, &switch_mu, GraphEvent::ItemChanged(group));
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.drag.active = false;
			s.drag.node_idx = None;
			s.pan.active = false;
			s.set_hover(None);
		}
	};

	let (state_wh, switch_wh) = (state.clone(), switch.clone());
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_position(canvas_ref, &ev) else {
			return;
		};
		let zoom = {
			let mut guard = state_wh.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			let new_k = (s.transform.k * factor).clamp(0.1, 10.0);
			let ratio = new_k / s.transform.k;
			s.transform.x = x - (x - s.transform.x) * ratio;
			s.transform.y = y - (y - s.transform.y) * ratio;
			s.transform.k = new_k;
			new_k
		};
		set_zoom_percent.set((zoom * 100.0).floor() as u32);
		dispatch(&state_wh, &switch_wh, GraphEvent::ZoomChanged(zoom));
	};

	let (state_dc, switch_dc) = (state.clone(), switch.clone());
	let on_dblclick = move |ev: MouseEvent| {
		let Some((x, y)) = local_position(canvas_ref, &ev) else {
			return;
		};
		let created = {
			let mut guard = state_dc.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			if s.node_at_position(x, y).is_some() {
				return;
			}
			let item = s.create_node_at(x, y);
			set_counts.set(s.counts());
			item
		};
		dispatch(&state_dc, &switch_dc, GraphEvent::ItemCreated(created));
	};

	let (state_kd, switch_kd) = (state.clone(), switch.clone());
	let on_keydown = move |ev: KeyboardEvent| {
		if !matches!(ev.key().as_str(), "Delete" | "Backspace") {
			return;
		}
		let removed = {
			let mut guard = state_kd.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			let Some(item) = s.hover.node else {
				return;
			};
			let removed = s.remove_node(item);
			set_counts.set(s.counts());
			removed
		};
		ev.prevent_default();
		for item in removed {
			dispatch(&state_kd, &switch_kd, GraphEvent::ItemRemoved(item));
		}
	};

	let (state_th, switch_th) = (state.clone(), switch.clone());
	let on_threshold = move |_| {
		let Some(select) = threshold_ref.get() else {
			return;
		};
		let raw = select.value();
		let value = match parse_threshold(&raw) {
			Ok(value) => value,
			Err(err) => {
				warn!("{err}");
				return;
			}
		};
		if let (Some(graph), Some(switch)) =
			(state_th.borrow_mut().as_mut(), switch_th.borrow_mut().as_mut())
		{
			if let Err(err) = switch.set_threshold(graph, value) {
				warn!("{err}");
			}
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			on:dblclick=on_dblclick
			on:keydown=on_keydown
			tabindex="0"
			style="display: block; cursor: grab; outline: none;"
		/>
		<div class="rendering-info">
			<label>
				"SVG threshold "
				<select node_ref=threshold_ref on:change=on_threshold>
					{THRESHOLD_OPTIONS
						.iter()
						.map(|option| {
							view! {
								<option value=option.value selected={option.value == selected}>
									{option.text}
								</option>
							}
						})
						.collect_view()}
				</select>
			</label>
			<p>"Zoom: " {move || zoom_percent.get()} "%"</p>
			<p>"Rendering: " {move || rendering_type.get().to_string()}</p>
			<p>"Nodes: " {move || counts.get().0} " | Edges: " {move || counts.get().1}</p>
		</div>
		<div class=move || {
			if popup.get().is_some() { "rendering-popup visible" } else { "rendering-popup" }
		}>
			{move || popup.get().unwrap_or_default()}
		</div>
	}
}
