//! Behavioural scenarios for the saturation engine.
//!
//! Trees are built by hand with the node builders; expected outputs are
//! built the same way so structural equality can be asserted directly.

use saturate::util::{collect_refs, without_known};
use saturate::{
    Component, DetectedComponents, Element, HasIdentity, LiveRef, MarkupRenderer, Node, Props,
    RefSet, RenderError, SaturateConfig, Saturator, saturate_tree,
};

fn prop(props: &Props, key: &str) -> Node {
    props.get(key).cloned().unwrap_or_default()
}

fn greeting() -> Element {
    Element::new("div")
        .child("Hello ")
        .child(Element::new("em").child("dear"))
        .child(" world!")
}

fn run_with(config: &SaturateConfig, tree: &Node) -> (Node, DetectedComponents) {
    let mut found = DetectedComponents::new();
    let out = Saturator::new(config).with_detected(&mut found).saturate(tree);
    (out, found)
}

// ── Basic html ──────────────────────────────────────────────────────

#[test]
fn plain_text_collapses() {
    let tree: Node = Element::new("div").child("Hello world!").into();
    let expected: Node = Element::new("div").markup("Hello world!").into();
    assert_eq!(saturate_tree(&tree, &SaturateConfig::new()), expected);
}

#[test]
fn nested_markup_collapses() {
    let out = saturate_tree(&Node::from(greeting()), &SaturateConfig::new());
    let expected: Node = Element::new("div").markup("Hello <em>dear</em> world!").into();
    assert_eq!(out, expected);
    assert!(out.as_element().unwrap().child_nodes().is_empty());
}

fn page_body(em: Element, first_li: Element) -> Element {
    Element::new("div")
        .child(
            Element::new("p")
                .child("Hello ")
                .child(em)
                .child(" world!"),
        )
        .child(
            Element::new("ul")
                .child(first_li)
                .child(Element::new("li").child("Two")),
        )
}

#[test]
fn deep_static_tree_collapses_at_the_root() {
    let tree: Node = page_body(
        Element::new("em").child("dear"),
        Element::new("li").child("One"),
    )
    .into();
    let expected: Node = Element::new("div")
        .markup("<p>Hello <em>dear</em> world!</p><ul><li>One</li><li>Two</li></ul>")
        .into();
    assert_eq!(saturate_tree(&tree, &SaturateConfig::new()), expected);
}

#[test]
fn root_handler_keeps_attributes_but_collapses_children() {
    let handler = LiveRef::handle("alert");
    let tree: Node = page_body(
        Element::new("em").child("dear"),
        Element::new("li").child("One"),
    )
    .prop("className", "yup")
    .prop("onClick", &handler)
    .into();

    let config = SaturateConfig::new();
    let out = Saturator::new(&config).run(&tree);
    let expected: Node = Element::new("div")
        .prop("className", "yup")
        .prop("onClick", &handler)
        .markup("<p>Hello <em>dear</em> world!</p><ul><li>One</li><li>Two</li></ul>")
        .into();
    assert_eq!(out.node, expected);
    assert!(!out.is_static);
    assert!(out.must_keep.contains(&handler));
}

#[test]
fn nested_handler_blocks_its_ancestors_only() {
    let handler = LiveRef::handle("alert");
    let tree: Node = page_body(
        Element::new("em").prop("onClick", &handler).child("dear"),
        Element::new("li").child("One"),
    )
    .prop("className", "yup")
    .prop("onClick", &handler)
    .into();

    let expected: Node = Element::new("div")
        .prop("className", "yup")
        .prop("onClick", &handler)
        .child(
            Element::new("p")
                .child("Hello ")
                .child(Element::new("em").prop("onClick", &handler).markup("dear"))
                .child(" world!"),
        )
        .child(Element::new("ul").markup("<li>One</li><li>Two</li>"))
        .into();
    assert_eq!(saturate_tree(&tree, &SaturateConfig::new()), expected);
}

#[test]
fn handler_on_a_list_item_keeps_the_list_open() {
    let handler = LiveRef::handle("alert");
    let tree: Node = page_body(
        Element::new("em").prop("data-what", "ok").child("dear"),
        Element::new("li").prop("onClick", &handler).child("One"),
    )
    .prop("className", "yup")
    .prop("onClick", &handler)
    .into();

    let expected: Node = Element::new("div")
        .prop("className", "yup")
        .prop("onClick", &handler)
        .child(Element::new("p").markup(r#"Hello <em data-what="ok">dear</em> world!"#))
        .child(
            Element::new("ul")
                .child(Element::new("li").prop("onClick", &handler).markup("One"))
                .child(Element::new("li").markup("Two")),
        )
        .into();
    assert_eq!(saturate_tree(&tree, &SaturateConfig::new()), expected);
}

// ── Components ──────────────────────────────────────────────────────

fn farewell(name: Node, em: Element) -> Element {
    Element::new("div")
        .child("So long, ")
        .child(em)
        .child(", ")
        .child(Element::new("strong").child(name))
        .child("!")
}

fn people(items: impl IntoIterator<Item = Node>) -> Element {
    Element::new("div")
        .child(Element::new("h1").child("People"))
        .child(Element::new("ul").children(items))
}

#[test]
fn dumb_components_compile_away() {
    let comp = Component::new("Comp1", |props, _| {
        Ok(farewell(prop(props, "name"), Element::new("em").child("farewell")).into())
    });
    let tree: Node = people(["Jack", "Jane"].map(|name| {
        Node::from(
            Element::new("li")
                .key(name)
                .child(comp.element().key(name).prop("name", name)),
        )
    }))
    .into();

    let (out, found) = run_with(&SaturateConfig::new(), &tree);
    let expected: Node = Element::new("div")
        .markup(
            "<h1>People</h1><ul>\
             <li><div>So long, <em>farewell</em>, <strong>Jack</strong>!</div></li>\
             <li><div>So long, <em>farewell</em>, <strong>Jane</strong>!</div></li>\
             </ul>",
        )
        .into();
    assert_eq!(out, expected);
    assert!(found.is_empty());
}

#[test]
fn unregistered_handler_preserves_the_component_once() {
    let handler = LiveRef::handle("alert");
    let inner = handler.clone();
    let comp = Component::new("Comp1", move |props, _| {
        Ok(farewell(
            prop(props, "name"),
            Element::new("em").prop("onClick", &inner).child("farewell"),
        )
        .into())
    });
    let tree: Node = people(["Jack", "Jane"].map(|name| {
        Node::from(
            Element::new("li")
                .key(name)
                .child(comp.element().prop("name", name)),
        )
    }))
    .into();

    let (out, found) = run_with(&SaturateConfig::new(), &tree);
    let expected: Node = Element::new("div")
        .child(Element::new("h1").markup("People"))
        .child(Element::new("ul").children(["Jack", "Jane"].map(|name| {
            Element::new("li")
                .key(name)
                .child(comp.element().prop("name", name))
        })))
        .into();
    assert_eq!(out, expected);
    assert_eq!(found.len(), 1);
    assert!(found.contains(&comp));

    // Registering the handler lets the component compile away.
    let config = SaturateConfig::new().with_known(&handler);
    let (out, found) = run_with(&config, &tree);
    let expected: Node = Element::new("div")
        .child(Element::new("h1").markup("People"))
        .child(Element::new("ul").children(["Jack", "Jane"].map(|name| {
            Element::new("li").key(name).child(
                Element::new("div")
                    .child("So long, ")
                    .child(Element::new("em").prop("onClick", &handler).markup("farewell"))
                    .child(", ")
                    .child(Element::new("strong").markup(name))
                    .child("!"),
            )
        })))
        .into();
    assert_eq!(out, expected);
    assert!(found.is_empty());
}

fn slotted() -> Component {
    Component::new("Comp1", |props, _| {
        Ok(farewell(
            prop(props, "name"),
            Element::new("em").child(props.children()),
        )
        .into())
    })
}

#[test]
fn slots_compile_away() {
    let comp = slotted();
    let tree: Node = Element::new("div")
        .child(Element::new("h1").child("People"))
        .child(
            comp.element()
                .prop("name", Element::new("span").prop("className", "good").child("Jack"))
                .child(Element::new("span").child("this is my greeting")),
        )
        .into();

    let (out, found) = run_with(&SaturateConfig::new(), &tree);
    let expected: Node = Element::new("div")
        .markup(
            "<h1>People</h1><div>So long, <em><span>this is my greeting</span></em>, \
             <strong><span class=\"good\">Jack</span></strong>!</div>",
        )
        .into();
    assert_eq!(out, expected);
    assert!(found.is_empty());
}

#[test]
fn handlers_in_slot_content_are_not_blamed_on_the_component() {
    let handler = LiveRef::handle("alert");
    let comp = slotted();
    let tree: Node = Element::new("div")
        .child(Element::new("h1").child("People"))
        .child(
            comp.element()
                .prop("name", Element::new("span").prop("className", "good").child("Jack"))
                .child(Element::new("span").prop("onClick", &handler).child("my greeting")),
        )
        .into();

    let (out, found) = run_with(&SaturateConfig::new(), &tree);
    let expected: Node = Element::new("div")
        .child(Element::new("h1").markup("People"))
        .child(
            Element::new("div")
                .child("So long, ")
                .child(
                    Element::new("em").child(
                        Element::new("span")
                            .prop("onClick", &handler)
                            .markup("my greeting"),
                    ),
                )
                .child(", ")
                .child(Element::new("strong").markup(r#"<span class="good">Jack</span>"#))
                .child("!"),
        )
        .into();
    assert_eq!(out, expected);
    assert!(found.is_empty());
}

#[test]
fn handlers_in_named_slots_are_not_blamed_on_the_component() {
    let handler = LiveRef::handle("alert");
    let comp = slotted();
    let tree: Node = Element::new("div")
        .child(Element::new("h1").child("People"))
        .child(
            comp.element()
                .prop(
                    "name",
                    Element::new("span")
                        .prop("onClick", &handler)
                        .prop("className", "good")
                        .child("Jack"),
                )
                .child(Element::new("span").child("my greeting")),
        )
        .into();

    let (out, found) = run_with(&SaturateConfig::new(), &tree);
    let expected: Node = Element::new("div")
        .child(Element::new("h1").markup("People"))
        .child(
            Element::new("div")
                .child("So long, ")
                .child(Element::new("em").markup("<span>my greeting</span>"))
                .child(", ")
                .child(
                    Element::new("strong").child(
                        Element::new("span")
                            .prop("onClick", &handler)
                            .prop("className", "good")
                            .markup("Jack"),
                    ),
                )
                .child("!"),
        )
        .into();
    assert_eq!(out, expected);
    assert!(found.is_empty());
}

fn clicky() -> Component {
    Component::new("Comp1", |props, _| {
        let msg = props.text("msg").unwrap_or_default().to_string();
        let on_click = LiveRef::callback("alert", move |_| Node::from(format!("Clicked {msg}")));
        Ok(Element::new("div")
            .child("So long, ")
            .child(Element::new("em").prop("onClick", on_click).child(props.children()))
            .child("!")
            .into())
    })
}

#[test]
fn components_attaching_handlers_are_preserved() {
    let comp = clicky();
    let tree: Node = Element::new("div")
        .child(Element::new("h1").child("People"))
        .child(
            comp.element()
                .prop("msg", "oops")
                .child(Element::new("span").child("my greeting")),
        )
        .into();

    let (out, found) = run_with(&SaturateConfig::new(), &tree);
    let expected: Node = Element::new("div")
        .child(Element::new("h1").markup("People"))
        .child(
            comp.element()
                .prop("msg", "oops")
                .child(Element::new("span").markup("my greeting")),
        )
        .into();
    assert_eq!(out, expected);
    assert_eq!(found.names(), vec!["Comp1"]);
}

#[test]
fn wrappers_around_preserved_components_compile_away() {
    let comp = clicky();
    let section = Component::new("Comp2", |props, _| {
        Ok(Element::new("section").child(props.children()).into())
    });
    let tree: Node = section
        .element()
        .child(
            comp.element().prop("msg", "ok").child(
                Element::new("div")
                    .child("I do not ")
                    .child(Element::new("em").child("think so")),
            ),
        )
        .into();

    let (out, found) = run_with(&SaturateConfig::new(), &tree);
    let expected: Node = Element::new("section")
        .child(
            comp.element()
                .prop("msg", "ok")
                .child(Element::new("div").markup("I do not <em>think so</em>")),
        )
        .into();
    assert_eq!(out, expected);
    assert_eq!(found.len(), 1);
    assert!(found.contains(&comp));
    assert!(!found.contains(&section));
}

#[test]
fn components_using_state_are_preserved() {
    let comp = Component::new("Comp1", |props, hooks| {
        let (blah, _set) = hooks.use_state(false)?;
        Ok(Element::new("div")
            .child("So long, ")
            .child(Element::new("em").child(props.children()))
            .child(" and ")
            .child(blah)
            .child("!")
            .into())
    });
    let tree: Node = Element::new("div")
        .child(Element::new("h1").child("People"))
        .child(
            comp.element().child(
                Element::new("span")
                    .child("delicious ")
                    .child(Element::new("strong").child("cake")),
            ),
        )
        .into();

    let (out, found) = run_with(&SaturateConfig::new(), &tree);
    let expected: Node = Element::new("div")
        .child(Element::new("h1").markup("People"))
        .child(
            comp.element()
                .child(Element::new("span").markup("delicious <strong>cake</strong>")),
        )
        .into();
    assert_eq!(out, expected);
    assert!(found.contains(&comp));
}

#[test]
fn unused_live_props_do_not_block_the_parent() {
    let child = Component::new("Child", |_, _| {
        Ok(Element::new("span").child("Oh hai").into())
    });
    let parent = Component::new("Parent", move |_, _| {
        let greet = LiveRef::callback("greet", |_| Node::from("hi"));
        Ok(Element::new("div")
            .child(child.element().prop("greet", greet))
            .into())
    });

    let tree: Node = parent.element().into();
    let expected: Node = Element::new("div").markup("<span>Oh hai</span>").into();
    assert_eq!(saturate_tree(&tree, &SaturateConfig::new()), expected);
}

#[test]
fn live_props_of_a_preserved_child_block_the_parent() {
    let child = Component::new("Child", |_, _| {
        Ok(Element::new("span")
            .prop("onClick", LiveRef::handle("yup"))
            .child("Oh hai")
            .into())
    });
    let parent = Component::new("Parent", move |_, _| {
        let greet = LiveRef::callback("greet", |_| Node::from("hi"));
        Ok(Element::new("div")
            .child(child.element().prop("greet", greet))
            .into())
    });

    let tree: Node = parent.element().into();
    let (out, found) = run_with(&SaturateConfig::new(), &tree);
    assert_eq!(out, tree);
    assert_eq!(found.names(), vec!["Child", "Parent"]);
}

#[test]
fn components_attaching_handles_are_preserved() {
    let comp = Component::new("Comp1", |props, _| {
        let log = LiveRef::callback("log", |_| Node::Null);
        Ok(Element::new("div").attach(&log).child(props.children()).into())
    });
    let tree: Node = comp
        .element()
        .child("Hello ")
        .child(Element::new("em").child("there"))
        .child(" you")
        .into();

    let (out, found) = run_with(&SaturateConfig::new(), &tree);
    let expected: Node = comp
        .element()
        .child("Hello ")
        .child(Element::new("em").markup("there"))
        .child(" you")
        .into();
    assert_eq!(out, expected);
    assert!(found.contains(&comp));
}

// ── Blog post examples ──────────────────────────────────────────────

fn pokemons() -> Node {
    let entry = |slug: &str, name: &str, types: &[&str]| {
        let mut p = Props::new();
        p.insert("slug", slug);
        p.insert("name", name);
        p.insert("types", Node::list(types.iter().copied()));
        Node::Map(p)
    };
    Node::list([
        entry("pikachu", "Pikachu", &["Electric"]),
        entry("bulbasaur", "Bulbasaur", &["Grass", "Poison"]),
    ])
}

fn chip() -> Component {
    Component::new("Chip", |props, _| {
        Ok(Element::new("span")
            .prop("className", "chip")
            .child(prop(props, "text"))
            .into())
    })
}

fn pokemon_card(chip: Component, link: Option<Component>) -> Component {
    Component::new("PokemonCard", move |props, _| {
        let pokemon = props
            .get("pokemon")
            .and_then(Node::as_map)
            .ok_or_else(|| RenderError::failed("missing pokemon"))?;
        let types = pokemon
            .get("types")
            .and_then(Node::as_list)
            .unwrap_or_default();
        let mut card = Element::new("div")
            .prop("className", "card")
            .child(Element::new("div").prop("className", "title").child(prop(pokemon, "name")))
            .child(
                Element::new("div")
                    .children(types.iter().map(|t| chip.element().prop("text", t.clone()))),
            );
        if let Some(link) = &link {
            let slug = pokemon.text("slug").unwrap_or_default();
            card = card.child(
                link.element()
                    .prop("href", format!("/p/{slug}"))
                    .child(Element::new("a").child("Read more")),
            );
        }
        Ok(card.into())
    })
}

fn page(card: Component) -> Component {
    Component::new("Page", move |props, _| {
        let list = prop(props, "pokemons");
        let items = list.as_list().unwrap_or_default();
        Ok(Element::new("div")
            .children(items.iter().map(|p| card.element().prop("pokemon", p.clone())))
            .into())
    })
}

#[test]
fn static_pages_flatten_completely() {
    let page = page(pokemon_card(chip(), None));
    let tree: Node = page.element().prop("pokemons", pokemons()).into();

    let (out, found) = run_with(&SaturateConfig::new(), &tree);
    let expected: Node = Element::new("div")
        .markup(
            "<div class=\"card\"><div class=\"title\">Pikachu</div>\
             <div><span class=\"chip\">Electric</span></div></div>\
             <div class=\"card\"><div class=\"title\">Bulbasaur</div>\
             <div><span class=\"chip\">Grass</span><span class=\"chip\">Poison</span></div></div>",
        )
        .into();
    assert_eq!(out, expected);
    assert!(found.is_empty());
}

#[test]
fn known_client_links_survive_inside_flattened_pages() {
    let link = Component::new("Link", |props, _| Ok(props.children()));
    let page = page(pokemon_card(chip(), Some(link.clone())));
    let tree: Node = page.element().prop("pokemons", pokemons()).into();

    let config = SaturateConfig::new().with_known(&link);
    let (out, found) = run_with(&config, &tree);

    let card = |slug: &str, name: &str, chips: &str| {
        Element::new("div")
            .prop("className", "card")
            .child(Element::new("div").prop("className", "title").markup(name))
            .child(Element::new("div").markup(chips))
            .child(
                link.element()
                    .prop("href", format!("/p/{slug}"))
                    .child(Element::new("a").markup("Read more")),
            )
    };
    let expected: Node = Element::new("div")
        .child(card(
            "pikachu",
            "Pikachu",
            r#"<span class="chip">Electric</span>"#,
        ))
        .child(card(
            "bulbasaur",
            "Bulbasaur",
            r#"<span class="chip">Grass</span><span class="chip">Poison</span>"#,
        ))
        .into();
    assert_eq!(out, expected);
    assert_eq!(found.names(), vec!["Link"]);
}

#[test]
fn callbacks_passed_down_are_evaluated() {
    let chip = Component::new("Chip", |props, _| {
        let transformer = props
            .live_ref("transformer")
            .ok_or_else(|| RenderError::failed("missing transformer"))?;
        let text = transformer.call(&[prop(props, "text")])?;
        Ok(Element::new("span").prop("className", "chip").child(text).into())
    });
    let uppercase = Component::new("UppercaseChip", move |props, _| {
        let upper = LiveRef::callback("to_upper", |args| match args.first() {
            Some(Node::Text(s)) => Node::Text(s.to_uppercase()),
            _ => Node::Null,
        });
        Ok(chip
            .element()
            .prop("text", prop(props, "text"))
            .prop("transformer", upper)
            .into())
    });

    let tree: Node = uppercase.element().prop("text", "hello").into();
    let expected: Node = Element::new("span")
        .prop("className", "chip")
        .markup("HELLO")
        .into();
    assert_eq!(saturate_tree(&tree, &SaturateConfig::new()), expected);
}

// ── Bare references and structured attributes ──────────────────────

#[test]
fn known_reference_child_keeps_its_parent_live() {
    let known = LiveRef::handle("portal");
    let config = SaturateConfig::new().with_known(&known);
    let tree: Node = Element::new("div").child("before ").child(&known).into();

    let out = Saturator::new(&config).run(&tree);
    assert!(!out.is_static);
    assert!(out.must_keep.is_empty());
    assert_eq!(out.node, tree);
    assert!(!out.node.as_element().unwrap().is_saturated());
}

#[test]
fn unknown_reference_child_is_reported() {
    let stray = LiveRef::handle("stray");
    let config = SaturateConfig::new();
    let tree: Node = Element::new("section")
        .child(Element::new("p").child(&stray))
        .into();

    let out = Saturator::new(&config).run(&tree);
    assert!(!out.is_static);
    assert_eq!(out.must_keep.len(), 1);
    assert!(out.must_keep.contains(&stray));
    assert_eq!(out.node, tree);
}

#[test]
fn structured_attributes_survive_an_ancestor() {
    let mut settings = Props::new();
    settings.insert("id", 7);
    let counter = Component::new("Counter", |_, hooks| {
        let (n, _) = hooks.use_state(0)?;
        Ok(Node::from(n))
    });
    let tree: Node = Element::new("section")
        .child(Element::new("div").prop("config", settings.clone()).child("x"))
        .child(Element::new("div").prop("icon", counter.element()).child("y"))
        .into();

    let (out, found) = run_with(&SaturateConfig::new(), &tree);
    let expected: Node = Element::new("section")
        .child(Element::new("div").prop("config", settings).markup("x"))
        .child(Element::new("div").prop("icon", counter.element()).markup("y"))
        .into();
    assert_eq!(out, expected);
    // Attribute values are carried, never invoked.
    assert!(found.is_empty());
}

// ── Properties ──────────────────────────────────────────────────────

fn assert_sound(config: &SaturateConfig, tree: &Node) {
    let out = Saturator::new(config).run(tree);
    let mut reachable = RefSet::new();
    collect_refs(&out.node, &mut reachable);
    for r in without_known(&reachable, &config.known) {
        assert!(out.must_keep.contains(&r), "{r:?} lost from must_keep");
    }
}

#[test]
fn static_saturation_is_idempotent() {
    let comp = chip();
    let trees: Vec<Node> = vec![
        greeting().into(),
        page_body(
            Element::new("em").child("dear"),
            Element::new("li").child("One"),
        )
        .into(),
        Element::new("ul")
            .child(comp.element().prop("text", "a"))
            .child(Element::new("img").prop("src", "x.png"))
            .into(),
    ];
    let config = SaturateConfig::new();
    for tree in trees {
        let once = saturate_tree(&tree, &config);
        assert_eq!(saturate_tree(&once, &config), once);
    }
}

#[test]
fn unresolved_references_are_always_reported() {
    let handler = LiveRef::handle("alert");
    let known = LiveRef::handle("known");
    let comp = clicky();
    let tree: Node = Element::new("div")
        .child(
            page_body(
                Element::new("em").prop("onClick", &handler).child("dear"),
                Element::new("li").prop("onClick", &known).child("One"),
            ),
        )
        .child(comp.element().prop("payload", &handler).child("x"))
        .into();

    assert_sound(&SaturateConfig::new(), &tree);
    assert_sound(&SaturateConfig::new().with_known(&known), &tree);
}

#[test]
fn structural_wrapper_chains_collapse_to_the_leaf() {
    let handler = LiveRef::handle("alert");
    let mut inner = Component::new("Leaf", |props, _| {
        Ok(Element::new("button")
            .prop("onClick", prop(props, "onClick"))
            .child("Go")
            .into())
    });
    for i in 0..5 {
        let next = inner.clone();
        inner = Component::new(format!("Wrapper{i}"), move |props, _| {
            Ok(next.element().prop("onClick", prop(props, "onClick")).into())
        });
    }

    let tree: Node = inner.element().prop("onClick", &handler).into();
    let (out, found) = run_with(&SaturateConfig::new(), &tree);
    let expected: Node = Element::new("button")
        .prop("onClick", &handler)
        .markup("Go")
        .into();
    assert_eq!(out, expected);
    assert!(found.is_empty());
}

#[test]
fn sibling_invocations_detect_a_component_once() {
    let comp = Component::new("Clicker", |_, _| {
        Ok(Element::new("button")
            .prop("onClick", LiveRef::handle("click"))
            .child("+")
            .into())
    });
    let tree = Node::list([comp.element(), comp.element(), comp.element()]);

    let config = SaturateConfig::new();
    let mut found = DetectedComponents::new();
    let out = Saturator::new(&config).with_detected(&mut found).run(&tree);
    assert_eq!(out.node, tree);
    assert_eq!(found.len(), 1);
    assert_eq!(out.stats.components_preserved, 3);
    assert_eq!(out.unknown_components.len(), 1);
}

#[test]
fn detected_set_accumulates_across_runs() {
    let a = clicky();
    let b = Component::new("Stateful", |_, hooks| {
        hooks.use_effect(|| {})?;
        Ok(Node::Null)
    });
    let config = SaturateConfig::new();
    let mut found = DetectedComponents::new();
    Saturator::new(&config)
        .with_detected(&mut found)
        .saturate(&Node::from(a.element()));
    Saturator::new(&config)
        .with_detected(&mut found)
        .saturate(&Node::list([a.element(), b.element()]));
    assert_eq!(found.names(), vec!["Comp1", "Stateful"]);
}

#[test]
fn panicking_components_are_preserved() {
    let comp = Component::new("Boom", |_, _| panic!("render exploded"));
    let tree: Node = Element::new("div").child(comp.element()).into();
    let (out, found) = run_with(&SaturateConfig::new(), &tree);
    assert_eq!(out, tree);
    assert!(found.contains(&comp));
}

#[test]
fn forced_static_tags_and_components_fold_into_markup() {
    let counter = Component::new("Counter", |_, hooks| {
        let (n, _) = hooks.use_state(0)?;
        Ok(Element::new("output").child(n).into())
    });
    let handler = LiveRef::handle("alert");
    let tree: Node = Element::new("div")
        .child(Element::new("svg").prop("onLoad", &handler).child("icon"))
        .child(counter.element())
        .into();

    let config = SaturateConfig::new()
        .with_force_static_tag("svg")
        .with_force_static_component(&counter);
    let (out, found) = run_with(&config, &tree);
    let expected: Node = Element::new("div")
        .markup("<svg>icon</svg><output>0</output>")
        .into();
    assert_eq!(out, expected);
    assert!(found.is_empty());
}

#[test]
fn known_components_are_never_invoked() {
    let invoked = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
    let flag = invoked.clone();
    let link = Component::new("Link", move |props, _| {
        flag.store(true, std::sync::atomic::Ordering::SeqCst);
        Ok(props.children())
    });
    let config = SaturateConfig::new().with_known(&link);
    let tree: Node = link.element().prop("href", "/").child("Home").into();
    let (out, found) = run_with(&config, &tree);

    assert_eq!(out, tree);
    assert!(found.contains(&link));
    assert!(!invoked.load(std::sync::atomic::Ordering::SeqCst));
    assert!(config.is_known(&link));
    assert_ne!(link.identity(), chip().identity());
}

#[test]
fn fragments_are_transparent() {
    let tree: Node = Element::new("p")
        .child(Node::fragment([
            Node::from("a "),
            Element::new("b").child("b").into(),
        ]))
        .into();
    let expected: Node = Element::new("p").markup("a <b>b</b>").into();
    assert_eq!(saturate_tree(&tree, &SaturateConfig::new()), expected);
}

#[test]
fn runaway_recursion_is_cut_off() {
    let slot = std::sync::Arc::new(std::sync::OnceLock::<Component>::new());
    let next = slot.clone();
    let nested = Component::new("Nested", move |_, _| {
        let inner = next.get().map(|c| Node::from(c.element())).unwrap_or_default();
        Ok(Element::new("div").child(inner).into())
    });
    let _ = slot.set(nested.clone());

    let config = SaturateConfig::new().with_max_render_depth(8);
    let (out, found) = run_with(&config, &Node::from(nested.element()));

    let mut depth = 0;
    let mut node = &out;
    while let Some(el) = node.as_element() {
        depth += 1;
        node = &el.child_nodes()[0];
    }
    assert_eq!(depth, 8);
    assert!(node.as_component().is_some());
    assert_eq!(found.names(), vec!["Nested"]);
}

struct CountingRenderer;

impl MarkupRenderer for CountingRenderer {
    fn render_markup(&self, nodes: &[Node]) -> String {
        format!("[{} nodes]", nodes.len())
    }
}

#[test]
fn custom_renderer_is_used_for_markup() {
    let config = SaturateConfig::new();
    let out = Saturator::new(&config)
        .with_renderer(&CountingRenderer)
        .saturate(&Node::from(greeting()));
    assert_eq!(out.as_element().unwrap().markup_str(), Some("[3 nodes]"));
}

#[test]
fn stats_count_decisions() {
    let comp = chip();
    let stateful = Component::new("Stateful", |_, hooks| {
        let (n, _) = hooks.use_state(1)?;
        Ok(Element::new("i").child(n).into())
    });
    let tree: Node = Element::new("div")
        .child(comp.element().prop("text", "a"))
        .child(stateful.element())
        .into();
    let config = SaturateConfig::new();
    let out = Saturator::new(&config).run(&tree);

    assert_eq!(out.stats.components_compiled_away, 1);
    assert_eq!(out.stats.components_preserved, 1);
    // The chip's span.
    assert_eq!(out.stats.elements_collapsed, 1);
    assert_eq!(
        serde_json::to_value(&out.stats).unwrap()["components_preserved"],
        1
    );
}
