// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cascade behavior across a small widget tree.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::rc::Rc;

use trellis_style::{
    ChangeOrigin, ComponentFactories, ComponentKind, Invalidation, ResolveCx, StyleChange,
    StyleDefinition, StyleKind, StyleProxy, StyleValue, StyledObject, Styleable, TypeDeclaration,
    TypeRegistry, WidgetType, compare_priority, level,
};

struct Widget {
    key: u32,
    parent: Option<u32>,
    style: Styleable<u32>,
}

impl StyledObject<u32> for Widget {
    fn styleable(&self) -> &Styleable<u32> {
        &self.style
    }

    fn styleable_mut(&mut self) -> &mut Styleable<u32> {
        &mut self.style
    }

    fn key(&self) -> u32 {
        self.key
    }

    fn parent_key(&self) -> Option<u32> {
        self.parent
    }
}

struct Types {
    registry: TypeRegistry,
    element: WidgetType,
    container: WidgetType,
    button: WidgetType,
    icon: WidgetType,
}

const ROUND_SKIN: ComponentKind = ComponentKind("RoundSkin");

fn types() -> Types {
    let mut registry = TypeRegistry::new();
    let element = registry
        .register(
            TypeDeclaration::new("Element")
                .style_invalidating("TextColor", StyleKind::Inheritable, Invalidation::RENDER)
                .style_invalidating("Color", StyleKind::Normal, Invalidation::RENDER)
                .style_invalidating("Padding", StyleKind::Normal, Invalidation::MEASURE)
                .default("TextColor", StyleValue::new("#000000"))
                .default("Color", StyleValue::new("#000000")),
        )
        .unwrap();
    let container = registry
        .register(TypeDeclaration::new("Container").extends(element))
        .unwrap();
    let button = registry
        .register(
            TypeDeclaration::new("Button")
                .extends(element)
                .style("State", StyleKind::Normal)
                .style_invalidating("SkinStyle", StyleKind::SubStyle, Invalidation::CHILDREN)
                .style_invalidating("SkinClass", StyleKind::Normal, Invalidation::CHILDREN)
                .default("State", StyleValue::new("up"))
                .default("UpTextColor", StyleValue::new("#222222"))
                .default(
                    "SkinStyle",
                    StyleValue::new(StyleDefinition::new().with("Radius", StyleValue::new(4_u32))),
                )
                .default("SkinClass", StyleValue::new(ROUND_SKIN)),
        )
        .unwrap();
    let icon = registry
        .register(
            TypeDeclaration::new("Icon")
                .extends(element)
                .default("State", StyleValue::new("none")),
        )
        .unwrap();
    Types {
        registry,
        element,
        container,
        button,
        icon,
    }
}

fn widget(types: &Types, ty: WidgetType, key: u32, parent: Option<u32>) -> Widget {
    Widget {
        key,
        parent,
        style: Styleable::new(key, types.registry.styles(ty)),
    }
}

#[test]
fn derived_type_scenario() {
    let mut registry = TypeRegistry::new();
    let base = registry
        .register(
            TypeDeclaration::new("Base")
                .style("Color", StyleKind::Normal)
                .default("Color", StyleValue::new("#000000")),
        )
        .unwrap();
    let derived = registry
        .register(TypeDeclaration::new("Derived").extends(base))
        .unwrap();

    let mut widget = Widget {
        key: 1,
        parent: None,
        style: Styleable::new(1, registry.styles(derived)),
    };
    let cx = ResolveCx::new(|_: u32| None);

    assert_eq!(cx.get_style(&widget, "Color"), Some(StyleValue::new("#000000")));

    let definition = StyleDefinition::new().with("Color", StyleValue::new("#FF0000"));
    widget.style.add_style_definition(definition);
    assert_eq!(cx.get_style(&widget, "Color"), Some(StyleValue::new("#FF0000")));

    widget.style.set_style("Color", StyleValue::new("#00FF00"));
    assert_eq!(cx.get_style(&widget, "Color"), Some(StyleValue::new("#00FF00")));

    widget.style.clear_style("Color");
    assert_eq!(cx.get_style(&widget, "Color"), Some(StyleValue::new("#FF0000")));
}

#[test]
fn shared_definition_reaches_every_holder() {
    let types = types();
    let mut a = widget(&types, types.element, 1, None);
    let mut b = widget(&types, types.button, 2, None);
    let theme = StyleDefinition::new();
    a.style.add_style_definition(theme.clone());
    b.style.add_style_definition(theme.clone());
    let cx = ResolveCx::new(|_: u32| None);

    // Warm both caches.
    assert_eq!(cx.get_style(&a, "Color"), Some(StyleValue::new("#000000")));
    assert_eq!(cx.get_style(&b, "Color"), Some(StyleValue::new("#000000")));

    theme.set_style("Color", StyleValue::new("#ABCDEF"));
    assert_eq!(cx.get_style(&a, "Color"), Some(StyleValue::new("#ABCDEF")));
    assert_eq!(cx.get_style(&b, "Color"), Some(StyleValue::new("#ABCDEF")));

    b.style.remove_style_definition(&theme);
    assert_eq!(cx.get_style(&b, "Color"), Some(StyleValue::new("#000000")));
    assert_eq!(cx.get_style(&a, "Color"), Some(StyleValue::new("#ABCDEF")));
}

#[test]
fn inheritance_boundary() {
    let types = types();
    let mut panel = widget(&types, types.container, 1, None);
    let label = widget(&types, types.element, 2, Some(1));
    panel.style.set_style("TextColor", StyleValue::new("#FFFFFF"));
    panel.style.set_style("Color", StyleValue::new("#FFFFFF"));

    let widgets: BTreeMap<u32, &Widget> = [(1, &panel), (2, &label)].into_iter().collect();
    let cx = ResolveCx::new(|key: u32| {
        widgets
            .get(&key)
            .map(|w| (w.styleable(), w.parent_key()))
    });

    assert_eq!(cx.get_style(&label, "TextColor"), Some(StyleValue::new("#FFFFFF")));
    assert_eq!(cx.get_style(&label, "Color"), Some(StyleValue::new("#000000")));
}

#[test]
fn container_change_is_seen_through_its_cache() {
    let types = types();
    let mut panel = widget(&types, types.container, 1, None);
    let label = widget(&types, types.element, 2, Some(1));
    let skin = StyleDefinition::new();
    panel.style.add_style_definition(skin.clone());

    {
        let widgets: BTreeMap<u32, &Widget> = [(1, &panel), (2, &label)].into_iter().collect();
        let cx = ResolveCx::new(|key: u32| {
            widgets
                .get(&key)
                .map(|w| (w.styleable(), w.parent_key()))
        });
        assert_eq!(cx.get_style(&label, "TextColor"), Some(StyleValue::new("#000000")));

        skin.set_style("TextColor", StyleValue::new("#FF00FF"));
        let data = cx.get_style_data(&label, "TextColor");
        assert_eq!(data.value, Some(StyleValue::new("#FF00FF")));
        assert_eq!(
            data.priority.levels(),
            &[level::INHERITED, level::DEFINITION, 0]
        );
    }

    panel.style.set_style("TextColor", StyleValue::new("#0000FF"));
    let widgets: BTreeMap<u32, &Widget> = [(1, &panel), (2, &label)].into_iter().collect();
    let cx = ResolveCx::new(|key: u32| {
        widgets
            .get(&key)
            .map(|w| (w.styleable(), w.parent_key()))
    });
    assert_eq!(cx.get_style(&label, "TextColor"), Some(StyleValue::new("#0000FF")));
}

#[test]
fn reparenting_changes_inherited_value() {
    let types = types();
    let mut light = widget(&types, types.container, 1, None);
    let mut dark = widget(&types, types.container, 2, None);
    let mut label = widget(&types, types.element, 3, Some(1));
    light.style.set_style("TextColor", StyleValue::new("#000000"));
    dark.style.set_style("TextColor", StyleValue::new("#FFFFFF"));

    {
        let widgets: BTreeMap<u32, &Widget> =
            [(1, &light), (2, &dark), (3, &label)].into_iter().collect();
        let cx = ResolveCx::new(|key: u32| {
            widgets
                .get(&key)
                .map(|w| (w.styleable(), w.parent_key()))
        });
        assert_eq!(cx.get_style(&label, "TextColor"), Some(StyleValue::new("#000000")));
    }

    label.parent = Some(2);
    label.style.hierarchy_changed();
    let widgets: BTreeMap<u32, &Widget> =
        [(1, &light), (2, &dark), (3, &label)].into_iter().collect();
    let cx = ResolveCx::new(|key: u32| {
        widgets
            .get(&key)
            .map(|w| (w.styleable(), w.parent_key()))
    });
    assert_eq!(cx.get_style(&label, "TextColor"), Some(StyleValue::new("#FFFFFF")));
}

#[test]
fn icon_follows_button_state() {
    let types = types();
    let mut button = widget(&types, types.button, 1, None);
    let mut icon = widget(&types, types.icon, 2, Some(1));
    icon.style
        .set_style_proxy(Some(StyleProxy::new(1).forward("State")));
    icon.style.set_style("Color", StyleValue::new("#123456"));

    {
        let widgets: BTreeMap<u32, &Widget> = [(1, &button), (2, &icon)].into_iter().collect();
        let cx = ResolveCx::new(|key: u32| {
            widgets
                .get(&key)
                .map(|w| (w.styleable(), w.parent_key()))
        });
        assert_eq!(cx.get_style(&icon, "State"), Some(StyleValue::new("up")));
        assert_eq!(cx.get_style(&icon, "Color"), Some(StyleValue::new("#123456")));
    }

    button.style.set_style("State", StyleValue::new("down"));
    button.style.set_style("Color", StyleValue::new("#654321"));
    {
        let widgets: BTreeMap<u32, &Widget> = [(1, &button), (2, &icon)].into_iter().collect();
        let cx = ResolveCx::new(|key: u32| {
            widgets
                .get(&key)
                .map(|w| (w.styleable(), w.parent_key()))
        });
        assert_eq!(cx.get_style(&icon, "State"), Some(StyleValue::new("down")));
        assert_eq!(cx.get_style(&icon, "Color"), Some(StyleValue::new("#123456")));
    }

    icon.style.set_style_proxy(None);
    let cx = ResolveCx::new(|_: u32| None);
    assert_eq!(cx.get_style(&icon, "State"), Some(StyleValue::new("none")));
}

#[test]
fn priority_comparison_between_styles() {
    let types = types();
    let mut button = widget(&types, types.button, 1, None);
    button
        .style
        .add_style_definition(StyleDefinition::new().with("TextColor", StyleValue::new("#FFFFFF")));
    let cx = ResolveCx::new(|_: u32| None);

    let up = cx.get_style_data(&button, "UpTextColor");
    let generic = cx.get_style_data(&button, "TextColor");
    assert_eq!(compare_priority(&generic, &up), Ordering::Greater);
    assert_eq!(
        cx.state_style(&button, "UpTextColor", "TextColor").value,
        Some(StyleValue::new("#FFFFFF"))
    );

    button.style.set_style("UpTextColor", StyleValue::new("#00FF00"));
    assert_eq!(
        cx.state_style(&button, "UpTextColor", "TextColor").value,
        Some(StyleValue::new("#00FF00"))
    );
}

#[test]
fn skin_receives_class_and_instance_sub_styles() {
    let types = types();
    let mut button = widget(&types, types.button, 1, None);
    let mut skin = Styleable::new(10_u32, types.registry.styles(types.element));

    let mut factories: ComponentFactories<&'static str> = ComponentFactories::new();
    factories.register(ROUND_SKIN, || "round skin");

    let cx = ResolveCx::new(|_: u32| None);
    assert_eq!(
        cx.create_component(&button, "SkinClass", &factories),
        Some("round skin")
    );

    cx.apply_sub_styles(&button, "SkinStyle", &mut skin);
    assert_eq!(
        skin.get_local_style_data("Radius").value,
        Some(StyleValue::new(4_u32))
    );

    let rounder = StyleDefinition::new().with("Radius", StyleValue::new(8_u32));
    button.style.add_style_definition(
        StyleDefinition::new().with("SkinStyle", StyleValue::new(rounder.clone())),
    );
    cx.apply_sub_styles(&button, "SkinStyle", &mut skin);
    assert_eq!(
        skin.get_local_style_data("Radius").value,
        Some(StyleValue::new(8_u32))
    );

    // The skin tracks later edits to the pushed definition.
    rounder.set_style("Radius", StyleValue::new(12_u32));
    assert_eq!(
        skin.get_local_style_data("Radius").value,
        Some(StyleValue::new(12_u32))
    );

    // A user definition on the skin itself still wins.
    skin.add_style_definition(StyleDefinition::new().with("Radius", StyleValue::new(0_u32)));
    assert_eq!(
        skin.get_local_style_data("Radius").value,
        Some(StyleValue::new(0_u32))
    );
}

#[test]
fn events_carry_invalidation_hints() {
    let types = types();
    let mut button = widget(&types, types.button, 1, None);
    let seen: Rc<RefCell<Vec<(String, ChangeOrigin, Invalidation)>>> =
        Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    button.style.add_style_listener(move |change: &StyleChange| {
        sink.borrow_mut().push((
            change.name.as_str().to_owned(),
            change.origin,
            change.invalidation,
        ));
    });

    let theme = StyleDefinition::new();
    button.style.add_style_definition(theme.clone());
    button.style.set_style("Padding", StyleValue::new(4_u32));
    theme.set_style("SkinClass", StyleValue::new(ComponentKind("Square")));
    button.style.set_style("Padding", StyleValue::new(4_u32));

    assert_eq!(
        *seen.borrow(),
        vec![
            (
                "Padding".to_owned(),
                ChangeOrigin::Instance,
                Invalidation::MEASURE
            ),
            (
                "SkinClass".to_owned(),
                ChangeOrigin::Definition,
                Invalidation::CHILDREN
            ),
        ]
    );
}

#[test]
fn skin_is_told_when_its_sub_styles_change() {
    let types = types();
    let mut button = widget(&types, types.button, 1, None);
    let mut skin = Styleable::new(10_u32, types.registry.styles(types.element));
    let seen: Rc<RefCell<Vec<(String, Option<StyleValue>, Invalidation)>>> =
        Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    skin.add_style_listener(move |change: &StyleChange| {
        assert_eq!(change.origin, ChangeOrigin::Attachment);
        sink.borrow_mut().push((
            change.name.as_str().to_owned(),
            change.new.clone(),
            change.invalidation,
        ));
    });
    let cx = ResolveCx::new(|_: u32| None);

    cx.apply_sub_styles(&button, "SkinStyle", &mut skin);
    assert_eq!(
        *seen.borrow(),
        vec![(
            "Radius".to_owned(),
            Some(StyleValue::new(4_u32)),
            Invalidation::empty()
        )]
    );

    seen.borrow_mut().clear();
    button.style.set_style(
        "SkinStyle",
        StyleValue::new(StyleDefinition::new().with("Color", StyleValue::new("#FFFFFF"))),
    );
    cx.apply_sub_styles(&button, "SkinStyle", &mut skin);
    assert_eq!(
        *seen.borrow(),
        vec![(
            "Color".to_owned(),
            Some(StyleValue::new("#FFFFFF")),
            Invalidation::RENDER
        )]
    );
}

#[test]
fn listener_cascades_within_one_call() {
    let types = types();
    let mut source = widget(&types, types.element, 1, None);
    let mut mirror = widget(&types, types.element, 2, None);
    let mirrored = StyleDefinition::new();
    mirror.style.add_style_definition(mirrored.clone());

    let target = mirrored.clone();
    source.style.add_style_listener(move |change: &StyleChange| {
        if let Some(value) = &change.new {
            target.set_style(change.name.clone(), value.clone());
        }
    });

    let cx = ResolveCx::new(|_: u32| None);
    assert_eq!(cx.get_style(&mirror, "Color"), Some(StyleValue::new("#000000")));
    source.style.set_style("Color", StyleValue::new("#FACADE"));
    assert_eq!(cx.get_style(&mirror, "Color"), Some(StyleValue::new("#FACADE")));
}
