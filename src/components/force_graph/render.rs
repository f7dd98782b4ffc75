use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{ForceGraphState, GROUP_PADDING, NODE_RADIUS, NODE_SIZE};
use crate::switching::style::{Caption, ContainerStyle, DetailLevel, DetailedNodeStyle, EdgeStyle};
use crate::switching::StyleDescriptor;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#f4f5f7");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_containers(state, ctx);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
	draw_tooltip(state, ctx);
}

/// Half the side of a container box; collapsed groups shrink to a node.
fn container_half(style: &ContainerStyle) -> f64 {
	if style.collapsed {
		NODE_SIZE / 2.0
	} else {
		NODE_SIZE + GROUP_PADDING
	}
}

fn draw_containers(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	state.graph.visit_nodes(|node| {
		let item = node.data.user_data;
		if state.is_hidden(item) {
			return;
		}
		let Some(StyleDescriptor::Container(style)) =
			state.node(item).and_then(|record| record.style.as_ref())
		else {
			return;
		};
		let (x, y) = (node.x() as f64, node.y() as f64);
		let half = container_half(style);
		container(ctx, style, x - half, y - half, half * 2.0);
	});
}

fn container(ctx: &CanvasRenderingContext2d, style: &ContainerStyle, x: f64, y: f64, size: f64) {
	ctx.begin_path();
	ctx.rect(x, y, size, size);
	ctx.set_fill_style_str(style.fill);
	ctx.fill();
	ctx.set_stroke_style_str(style.stroke);
	ctx.set_line_width(5.0);
	if style.collapsed {
		let _ = ctx.set_line_dash(&js_sys::Array::of2(&JsValue::from_f64(6.0), &JsValue::from_f64(4.0)));
	}
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_edges(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	state.graph.visit_edges(|n1, n2, edge| {
		let Some(item) = edge.user_data.filter(|&item| !state.is_hidden(item)) else {
			return;
		};
		let Some(StyleDescriptor::Edge(style)) = state.edge(item).and_then(|e| e.style.as_ref()) else {
			return;
		};
		let (x1, y1, x2, y2) = (n1.x() as f64, n1.y() as f64, n2.x() as f64, n2.y() as f64);
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			return;
		}
		let highlighted =
			state.is_highlighted(n1.data.user_data) && state.is_highlighted(n2.data.user_data);
		line(ctx, style, (x1, y1), (dx / dist, dy / dist), dist, k, highlighted);
	});
}

fn line(
	ctx: &CanvasRenderingContext2d,
	style: &EdgeStyle,
	(x1, y1): (f64, f64),
	(ux, uy): (f64, f64),
	dist: f64,
	k: f64,
	highlighted: bool,
) {
	let width = (if highlighted { style.width * 1.5 } else { style.width }) / k.max(0.5);
	let arrow_size = if style.arrow { 8.0 } else { 0.0 };
	let (x2, y2) = (x1 + ux * dist, y1 + uy * dist);
	let inset = NODE_RADIUS;

	ctx.set_stroke_style_str(style.stroke);
	ctx.set_line_width(width);
	ctx.begin_path();
	ctx.move_to(x1 + ux * inset, y1 + uy * inset);
	ctx.line_to(x2 - ux * (inset + arrow_size), y2 - uy * (inset + arrow_size));
	ctx.stroke();

	if !style.arrow {
		return;
	}
	ctx.set_fill_style_str(style.stroke);
	let (tip_x, tip_y) = (x2 - ux * inset, y2 - uy * inset);
	let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
	let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
	ctx.begin_path();
	ctx.move_to(tip_x, tip_y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let t = ease_out_cubic(state.hover.highlight_t.clamp(0.0, 1.0));
	state.graph.visit_nodes(|node| {
		let item = node.data.user_data;
		if state.is_hidden(item) {
			return;
		}
		let Some(record) = state.node(item) else {
			return;
		};
		let Some(style) = record.style.as_ref() else {
			return;
		};
		let (x, y) = (node.x() as f64, node.y() as f64);
		match style {
			StyleDescriptor::SimplifiedNode(simple) => {
				ctx.begin_path();
				let _ = ctx.arc(x, y, NODE_RADIUS, 0.0, 2.0 * PI);
				ctx.set_fill_style_str(simple.fill);
				ctx.fill();
			}
			StyleDescriptor::DetailedNode(detailed) => {
				detailed_node(ctx, detailed, x, y);
				if let Some(label) = &record.label {
					node_label(ctx, label, x, y + NODE_SIZE / 2.0 + 10.0);
				}
			}
			StyleDescriptor::Container(group) => {
				if let Some(label) = &record.label {
					node_label(ctx, label, x, y - container_half(group) - 4.0);
				}
				return;
			}
			StyleDescriptor::Edge(_) => return,
		}
		if state.hover.node == Some(item) && t > 0.01 {
			focus_ring(ctx, style, x, y, t);
		}
	});
}

fn detailed_node(ctx: &CanvasRenderingContext2d, style: &DetailedNodeStyle, cx: f64, cy: f64) {
	let half = NODE_SIZE / 2.0;
	let (x, y) = (cx - half, cy - half);

	ctx.set_fill_style_str("#ffffff");
	ctx.fill_rect(x, y, NODE_SIZE, NODE_SIZE);
	ctx.set_stroke_style_str("#c0c0c0");
	ctx.set_line_width(1.0);
	ctx.stroke_rect(x, y, NODE_SIZE, NODE_SIZE);

	ctx.set_fill_style_str(style.accent);
	ctx.fill_rect(x, y, NODE_SIZE, style.detail.header_height(NODE_SIZE));

	let text = if style.detail <= DetailLevel::Compact { "#ffffff" } else { "#171d26" };
	ctx.set_fill_style_str(text);
	if let Some(icon) = style.icon {
		let (ix, iy) = if style.centered_icon { (cx - 5.0, cy) } else { (x + 3.0, y + 16.0) };
		ctx.set_font("12px sans-serif");
		let _ = ctx.fill_text(icon.glyph(), ix, iy);
	}
	match &style.caption {
		Caption::Status(status) => {
			ctx.set_font("5px Roboto,sans-serif");
			let _ = ctx.fill_text(&format!("Status: {}", status.name()), x + 3.0, y + NODE_SIZE - 4.0);
		}
		Caption::Initials(initials) => {
			ctx.set_font("10px Roboto,sans-serif");
			let _ = ctx.fill_text(initials, x + 3.0, cy + 3.0);
		}
		Caption::None => {}
	}

	if !style.badges.any() {
		return;
	}
	let mut badge_x = x + NODE_SIZE;
	for (shown, color) in [(style.badges.globe, "#171d26"), (style.badges.resource, "#3272d9")] {
		if !shown {
			continue;
		}
		ctx.begin_path();
		let _ = ctx.arc(badge_x, y, 5.0, 0.0, 2.0 * PI);
		ctx.set_fill_style_str("#ffffff");
		ctx.fill();
		ctx.set_stroke_style_str(color);
		ctx.set_line_width(1.5);
		ctx.stroke();
		badge_x -= 12.0;
	}
}

fn node_label(ctx: &CanvasRenderingContext2d, label: &str, x: f64, y: f64) {
	ctx.set_font("8px Roboto,sans-serif");
	ctx.set_text_align("center");
	ctx.set_fill_style_str("#171d26");
	let _ = ctx.fill_text(label, x, y);
	ctx.set_text_align("start");
}

fn focus_ring(ctx: &CanvasRenderingContext2d, style: &StyleDescriptor, x: f64, y: f64, t: f64) {
	ctx.set_stroke_style_str(&format!("rgba(50, 115, 217, {})", 0.8 * t));
	ctx.set_line_width(3.0);
	ctx.begin_path();
	if let StyleDescriptor::DetailedNode(_) = style {
		let half = NODE_SIZE / 2.0 + 1.5;
		ctx.rect(x - half, y - half, half * 2.0, half * 2.0);
	} else {
		let _ = ctx.arc(x, y, NODE_RADIUS + 2.0, 0.0, 2.0 * PI);
	}
	ctx.stroke();
}

fn draw_tooltip(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let (Some(text), Some(item)) = (state.tooltip(), state.hover.node) else {
		return;
	};
	let mut anchor = None;
	state.graph.visit_nodes(|node| {
		if node.data.user_data == item {
			anchor = Some((node.x() as f64, node.y() as f64));
		}
	});
	let Some((gx, gy)) = anchor else {
		return;
	};
	let (sx, sy) = (
		gx * state.transform.k + state.transform.x + 15.0,
		gy * state.transform.k + state.transform.y + 15.0,
	);
	ctx.set_font("12px sans-serif");
	let width = text.chars().count() as f64 * 6.5;
	ctx.set_fill_style_str("rgba(255, 255, 255, 0.9)");
	ctx.fill_rect(sx, sy, width + 12.0, 22.0);
	ctx.set_fill_style_str("#171d26");
	let _ = ctx.fill_text(&text, sx + 6.0, sy + 15.0);
}
