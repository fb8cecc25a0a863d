//! Benchmarks for component resolution and action dispatch.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Value};
use soli_controller::component::{Component, ComponentBase, ComponentRegistry, ComponentType};
use soli_controller::controller::{ActionArgs, ActionResult, ActionTable, Controller, Dispatcher};
use soli_controller::{AppContext, ClientResponse, MemoryView, ServerRequest};
use std::any::Any;
use std::sync::Arc;

struct FlashComponent {
    base: ComponentBase,
}

impl Component for FlashComponent {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl ComponentType for FlashComponent {
    const TYPE_NAME: &'static str = "FlashComponent";

    fn defaults() -> Value {
        json!({"key": "flash", "cookie": {"secure": true, "path": "/"}})
    }

    fn build(base: ComponentBase) -> Self {
        Self { base }
    }
}

struct PostsController {
    dispatcher: Dispatcher,
}

impl PostsController {
    fn index(&mut self, _args: ActionArgs<'_>) -> ActionResult {
        self.set("count", json!(3));
        Ok(().into())
    }
}

impl Controller for PostsController {
    fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    fn dispatcher_mut(&mut self) -> &mut Dispatcher {
        &mut self.dispatcher
    }

    fn actions(table: &mut ActionTable<Self>) {
        table.action("index", Self::index);
    }
}

/// A registry with `depth` namespaces, the component living in the last one.
fn registry(depth: usize) -> ComponentRegistry {
    let registry = ComponentRegistry::new();
    for i in 0..depth {
        registry.add_namespace(&format!("app::plugin{}::components", i));
    }
    registry.define::<FlashComponent>(&format!("app::plugin{}::components", depth - 1));
    registry
}

fn find_warm(c: &mut Criterion) {
    let registry = registry(8);
    registry.find("Flash");

    c.bench_function("find_warm", |b| b.iter(|| registry.find(black_box("Flash"))));
}

fn find_cold(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_cold");
    for depth in [1, 8, 32] {
        let registry = registry(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, _| {
            b.iter(|| {
                registry.forget("Flash");
                registry.find(black_box("Flash"))
            })
        });
    }
    group.finish();
}

fn dispatch(c: &mut Criterion) {
    let view = MemoryView::new().with_template("Posts/index", "<h1><%= title %></h1> <%= count %>");
    let app = AppContext::new(Arc::new(view)).with_components(Arc::new(registry(4)));

    c.bench_function("invoke_action", |b| {
        b.iter(|| {
            let mut controller = PostsController {
                dispatcher: Dispatcher::new::<PostsController>(
                    &app,
                    ServerRequest::default(),
                    ClientResponse::new(),
                ),
            };
            controller
                .load_component("Flash", json!({"cookie": {"path": "/posts"}}))
                .expect("load error");
            controller
                .invoke_action(black_box("index"), vec![])
                .expect("dispatch error");
            controller.into_response()
        })
    });
}

criterion_group!(benches, find_warm, find_cold, dispatch);
criterion_main!(benches);
