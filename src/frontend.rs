use crate::catalog::{Catalog, VideoEntry};
use crate::config::ReelConfig;
use crate::effects::{
    anchor_fragment, button_style, card_style, header_is_raised, header_style, notice_style,
    scroll_target, FadePhase, HoverPhase, PressPhase,
};
use crate::error::StartupError;
use crate::facet::{neighbor_index, Facet, FacetFilter, FacetGroup, NavDirection, NoticeState, ALL};
use crate::logging::{log_event, LogLevel};
use serde_json::json;
use std::rc::Rc;
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{window, HtmlElement, KeyboardEvent, MouseEvent, ScrollBehavior, ScrollToOptions};
use yew::prelude::*;

const NAV_LINKS: [(&str, &str); 3] = [("#work", "Work"), ("#about", "About"), ("#contact", "Contact")];

/// A browser timeout that is cleared when dropped, so replacing or dropping
/// the task cancels a callback that has not fired yet.
struct ScheduledTask {
    handle: i32,
    _callback: Closure<dyn FnMut()>,
}

impl ScheduledTask {
    fn schedule(delay_ms: u32, task: impl FnOnce() + 'static) -> Option<Self> {
        let mut task = Some(task);
        let callback = Closure::<dyn FnMut()>::new(move || {
            if let Some(task) = task.take() {
                task();
            }
        });

        let handle = window()?
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                i32::try_from(delay_ms).unwrap_or(i32::MAX),
            )
            .ok()?;

        Some(Self {
            handle,
            _callback: callback,
        })
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        if let Some(win) = window() {
            win.clear_timeout_with_handle(self.handle);
        }
    }
}

struct WindowListener {
    event: &'static str,
    callback: Closure<dyn FnMut()>,
}

impl WindowListener {
    fn attach(event: &'static str, listener: impl FnMut() + 'static) -> Option<Self> {
        let callback = Closure::<dyn FnMut()>::new(listener);
        window()?
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .ok()?;

        Some(Self { event, callback })
    }
}

impl Drop for WindowListener {
    fn drop(&mut self) {
        if let Some(win) = window() {
            let _ = win.remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
        }
    }
}

fn current_scroll_y() -> f64 {
    window().and_then(|w| w.scroll_y().ok()).unwrap_or(0.0)
}

fn scroll_to_anchor(href: &str, header: &NodeRef) {
    let Some(selector) = anchor_fragment(href) else {
        return;
    };
    let Some(win) = window() else {
        return;
    };
    let Some(target) = win
        .document()
        .and_then(|document| document.query_selector(selector).ok().flatten())
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };

    let header_height = header
        .cast::<HtmlElement>()
        .map(|nav| f64::from(nav.offset_height()))
        .unwrap_or(0.0);

    let options = ScrollToOptions::new();
    options.set_top(scroll_target(f64::from(target.offset_top()), header_height));
    options.set_behavior(ScrollBehavior::Smooth);
    win.scroll_to_with_scroll_to_options(&options);
}

fn focus_and_click_neighbor(buttons: &[NodeRef], index: usize, event: &KeyboardEvent) {
    let Some(direction) = NavDirection::from_key(&event.key()) else {
        return;
    };
    let Some(next) = neighbor_index(index, buttons.len(), direction) else {
        return;
    };

    event.prevent_default();
    if let Some(button) = buttons[next].cast::<HtmlElement>() {
        let _ = button.focus();
    }
    click_button(buttons, Some(next));
}

/// Clicks a mounted filter button; `false` when it is not in the DOM.
fn click_button(buttons: &[NodeRef], index: Option<usize>) -> bool {
    let Some(button) = index
        .and_then(|index| buttons.get(index))
        .and_then(|node| node.cast::<HtmlElement>())
    else {
        return false;
    };

    button.click();
    true
}

fn node_refs(len: usize) -> Vec<NodeRef> {
    (0..len).map(|_| NodeRef::default()).collect()
}

enum FilterAction {
    Select(Facet, usize),
    Reset,
}

#[derive(PartialEq)]
struct FilterStore {
    filter: FacetFilter,
    config: ReelConfig,
}

impl Reducible for FilterStore {
    type Action = FilterAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut filter = self.filter.clone();

        let visibility = match action {
            FilterAction::Select(facet, index) => {
                if !filter.select_index(facet, index) {
                    return self;
                }
                log_event(
                    &self.config,
                    LogLevel::Info,
                    "facet_selected",
                    json!({
                        "group": facet.as_str(),
                        "value": filter.group(facet).active_value(),
                    }),
                );
                filter.refresh()
            }
            FilterAction::Reset => {
                log_event(&self.config, LogLevel::Info, "filters_reset", json!({}));
                filter.reset()
            }
        };

        let state = filter.state();
        log_event(
            &self.config,
            LogLevel::Debug,
            "visibility_evaluated",
            json!({
                "type": state.active_type,
                "format": state.active_format,
                "policy": filter.policy().as_str(),
                "visible": visibility.count(),
            }),
        );
        if visibility.is_empty() {
            log_event(
                &self.config,
                LogLevel::Info,
                "no_results_shown",
                json!({ "type": state.active_type, "format": state.active_format }),
            );
        }

        Rc::new(Self {
            filter,
            config: self.config.clone(),
        })
    }
}

#[derive(Properties, PartialEq)]
struct AnchorLinkProps {
    href: AttrValue,
    label: AttrValue,
    header: NodeRef,
    #[prop_or_default]
    class: Classes,
}

#[function_component(AnchorLink)]
fn anchor_link(props: &AnchorLinkProps) -> Html {
    let onclick = {
        let href = props.href.clone();
        let header = props.header.clone();
        Callback::from(move |event: MouseEvent| {
            event.prevent_default();
            scroll_to_anchor(&href, &header);
        })
    };

    html! {
        <a class={props.class.clone()} href={props.href.clone()} onclick={onclick}>
            {props.label.clone()}
        </a>
    }
}

#[derive(Properties, PartialEq)]
struct FilterButtonProps {
    facet: Facet,
    index: usize,
    label: AttrValue,
    value: AttrValue,
    active: bool,
    node_ref: NodeRef,
    on_select: Callback<usize>,
    onkeydown: Callback<KeyboardEvent>,
    press_revert_ms: u32,
}

#[function_component(FilterButton)]
fn filter_button(props: &FilterButtonProps) -> Html {
    let press = use_state_eq(PressPhase::default);
    let presses = use_state(|| 0u64);

    {
        let press = press.clone();
        let delay = props.press_revert_ms;
        use_effect_with(*presses, move |presses| {
            let revert = if *presses == 0 {
                None
            } else {
                press.set(PressPhase::Pressed);
                let press = press.clone();
                ScheduledTask::schedule(delay, move || press.set(PressPhase::Released))
            };
            move || drop(revert)
        });
    }

    let onclick = {
        let on_select = props.on_select.clone();
        let presses = presses.clone();
        let index = props.index;
        Callback::from(move |_: MouseEvent| {
            on_select.emit(index);
            presses.set(*presses + 1);
        })
    };

    let (type_value, format_value) = match props.facet {
        Facet::Type => (Some(props.value.clone()), None),
        Facet::Format => (None, Some(props.value.clone())),
    };

    html! {
        <button
            ref={props.node_ref.clone()}
            type="button"
            class={classes!("filter-btn", props.facet.button_class(), props.active.then_some("active"))}
            data-type-filter={type_value}
            data-format-filter={format_value}
            aria-pressed={props.active.to_string()}
            style={button_style(props.active, *press)}
            onclick={onclick}
            onkeydown={props.onkeydown.clone()}
        >
            {props.label.clone()}
        </button>
    }
}

#[derive(Properties, PartialEq)]
struct FilterBarProps {
    group: FacetGroup,
    label: AttrValue,
    buttons: Rc<Vec<NodeRef>>,
    on_select: Callback<usize>,
    press_revert_ms: u32,
}

#[function_component(FilterBar)]
fn filter_bar(props: &FilterBarProps) -> Html {
    let facet = props.group.facet();
    let buttons = &props.buttons;

    html! {
        <div class={classes!("filter-group", format!("{}-filters", facet.as_str()))} role="group" aria-label={props.label.clone()}>
            { for props.group.buttons().iter().enumerate().map(|(index, button)| {
                let onkeydown = {
                    let buttons = buttons.clone();
                    Callback::from(move |event: KeyboardEvent| {
                        focus_and_click_neighbor(&buttons, index, &event);
                    })
                };

                html! {
                    <FilterButton
                        key={button.value.clone()}
                        facet={facet}
                        index={index}
                        label={AttrValue::from(button.label.clone())}
                        value={AttrValue::from(button.value.clone())}
                        active={props.group.is_active(index)}
                        node_ref={buttons[index].clone()}
                        on_select={props.on_select.clone()}
                        onkeydown={onkeydown}
                        press_revert_ms={props.press_revert_ms}
                    />
                }
            }) }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct VideoCardProps {
    entry: VideoEntry,
    visible: bool,
    generation: u64,
    fade_delay_ms: u32,
}

#[function_component(VideoCard)]
fn video_card(props: &VideoCardProps) -> Html {
    let fade = use_state_eq(FadePhase::default);
    let hover = use_state_eq(HoverPhase::default);

    {
        let fade = fade.clone();
        let delay = props.fade_delay_ms;
        use_effect_with((props.visible, props.generation), move |(visible, _)| {
            let reveal = if *visible {
                fade.set(FadePhase::Pending);
                let fade = fade.clone();
                ScheduledTask::schedule(delay, move || fade.set(FadePhase::Revealed))
            } else {
                None
            };
            move || drop(reveal)
        });
    }

    let onmouseenter = {
        let hover = hover.clone();
        Callback::from(move |_: MouseEvent| hover.set(HoverPhase::Raised))
    };

    let onmouseleave = {
        let hover = hover.clone();
        Callback::from(move |_: MouseEvent| hover.set(HoverPhase::Lowered))
    };

    let entry = &props.entry;

    html! {
        <article
            class="video-card"
            data-type={entry.types.clone()}
            data-format={entry.format.clone()}
            style={card_style(props.visible, *fade, *hover)}
            onmouseenter={onmouseenter}
            onmouseleave={onmouseleave}
        >
            <div class="video-frame">
                <iframe
                    src={entry.embed.clone()}
                    title={entry.title.clone()}
                    loading="lazy"
                    allow="autoplay; fullscreen; picture-in-picture"
                ></iframe>
            </div>
            <h3 class="video-title">{entry.title.clone()}</h3>
            if let Some(caption) = entry.caption.as_ref() {
                <p class="video-caption muted">{caption.clone()}</p>
            }
        </article>
    }
}

#[derive(Properties, PartialEq)]
struct AppProps {
    catalog: Rc<Catalog>,
    filter: FacetFilter,
    config: ReelConfig,
}

fn select_callback(dispatcher: UseReducerDispatcher<FilterStore>, facet: Facet) -> Callback<usize> {
    Callback::from(move |index: usize| dispatcher.dispatch(FilterAction::Select(facet, index)))
}

#[function_component(App)]
fn app(props: &AppProps) -> Html {
    let store = {
        let filter = props.filter.clone();
        let config = props.config.clone();
        use_reducer(move || FilterStore { filter, config })
    };
    let header_raised = use_state_eq(|| false);
    let nav_ref = use_node_ref();
    let type_buttons = use_memo(props.filter.group(Facet::Type).buttons().len(), |len| node_refs(*len));
    let format_buttons = use_memo(props.filter.group(Facet::Format).buttons().len(), |len| node_refs(*len));

    {
        let header_raised = header_raised.clone();
        use_effect_with(props.config.header_threshold_px, move |threshold| {
            let threshold = *threshold;
            header_raised.set(header_is_raised(current_scroll_y(), threshold));
            let listener = WindowListener::attach("scroll", move || {
                header_raised.set(header_is_raised(current_scroll_y(), threshold));
            });
            move || drop(listener)
        });
    }

    let on_select_type = select_callback(store.dispatcher(), Facet::Type);
    let on_select_format = select_callback(store.dispatcher(), Facet::Format);
    // Reset clicks both "all" buttons so it takes the same path as a user
    // click; the reducer reset covers buttons that are not mounted.
    let on_reset = {
        let dispatcher = store.dispatcher();
        let targets = [
            (type_buttons.clone(), props.filter.group(Facet::Type).position(ALL)),
            (format_buttons.clone(), props.filter.group(Facet::Format).position(ALL)),
        ];
        Callback::from(move |_: MouseEvent| {
            if !targets.iter().all(|(buttons, all)| click_button(buttons, *all)) {
                dispatcher.dispatch(FilterAction::Reset);
            }
        })
    };

    let catalog = &props.catalog;
    let config = &props.config;
    let filter = &store.filter;
    let visibility = filter.evaluate_visibility();
    let generation = filter.generation();
    let notice = filter.notice();

    html! {
        <>
            <nav ref={nav_ref.clone()} class="site-nav" style={header_style(*header_raised)}>
                <AnchorLink class={classes!("nav-brand")} href="#top" label={catalog.owner.clone()} header={nav_ref.clone()} />
                <ul class="nav-links">
                    { for NAV_LINKS.iter().map(|(href, label)| html! {
                        <li key={*href}>
                            <AnchorLink href={*href} label={*label} header={nav_ref.clone()} />
                        </li>
                    }) }
                </ul>
            </nav>

            <header id="top" class="hero">
                <h1>{catalog.owner.clone()}</h1>
                <p class="muted">{catalog.tagline.clone()}</p>
            </header>

            <main id="content">
                <section id="work" class="section-block" aria-labelledby="work-heading">
                    <h2 id="work-heading">{"Work"}</h2>
                    <FilterBar
                        group={filter.group(Facet::Type).clone()}
                        label="Filter by type"
                        buttons={type_buttons.clone()}
                        on_select={on_select_type}
                        press_revert_ms={config.press_revert_ms}
                    />
                    <FilterBar
                        group={filter.group(Facet::Format).clone()}
                        label="Filter by format"
                        buttons={format_buttons.clone()}
                        on_select={on_select_format}
                        press_revert_ms={config.press_revert_ms}
                    />

                    <div class="video-grid">
                        { for catalog.videos.iter().enumerate().map(|(index, entry)| html! {
                            <VideoCard
                                key={entry.id.clone()}
                                entry={entry.clone()}
                                visible={visibility.is_visible(index)}
                                generation={generation}
                                fade_delay_ms={config.fade_delay_ms}
                            />
                        }) }
                        if notice != NoticeState::Absent {
                            <div class="no-results-message" style={notice_style(notice.is_shown())}>
                                <p>{"No videos found matching the selected filters."}</p>
                                <button type="button" class="reset-filters" onclick={on_reset}>
                                    {"Show All Videos"}
                                </button>
                            </div>
                        }
                    </div>
                </section>

                <section id="about" class="section-block" aria-labelledby="about-heading">
                    <h2 id="about-heading">{"About"}</h2>
                    <p>{"Editor and motion designer cutting promos, short films and event recaps."}</p>
                </section>

                <section id="contact" class="section-block" aria-labelledby="contact-heading">
                    <h2 id="contact-heading">{"Contact"}</h2>
                    <p>
                        <a class="link" href="mailto:hello@example.com">{"hello@example.com"}</a>
                    </p>
                </section>
            </main>
        </>
    }
}

fn start() -> Result<(), StartupError> {
    let root = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id("app"))
        .ok_or(StartupError::MissingMountPoint)?;

    let config = ReelConfig::from_lookup(|key| root.get_attribute(&format!("data-{key}")));
    let catalog = Catalog::bundled()?;
    let filter = FacetFilter::from_catalog(&catalog, config.type_match)?;

    log_event(
        &config,
        LogLevel::Info,
        "reel_started",
        json!({
            "videos": catalog.videos.len(),
            "type_match": config.type_match.as_str(),
        }),
    );

    yew::Renderer::<App>::with_root_and_props(
        root,
        AppProps {
            catalog: Rc::new(catalog),
            filter,
            config,
        },
    )
    .render();

    Ok(())
}

pub fn run() {
    if let Err(err) = start() {
        log_event(
            &ReelConfig::default(),
            LogLevel::Error,
            "startup_failed",
            json!({ "error": err.to_string() }),
        );
        wasm_bindgen::throw_str(&err.to_string());
    }
}
