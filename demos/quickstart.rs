use geochron::{
    is_geological_literal, EngineError, EngineEvent, EngineOptions, EngineResult, EventKind, Group,
    Marker, ParseError, ParseOutput, Rank, RenderEngine, RenderReport, SourceParser, TimeCodec,
    Timeline, TimelineItem, TimelineSettings, ViewWindow, VirtualDate,
};

/// `start | end | content` per line, `@ date | label` for markers and
/// `> overlays: Era, Period` for overlay lanes.
struct LineParser;

impl SourceParser for LineParser {
    fn parse(&self, source: &str, settings: &TimelineSettings) -> Result<ParseOutput, ParseError> {
        let codec = TimeCodec::new(&settings.codec)?;
        let mut output = ParseOutput::default();
        let mut errors = Vec::new();

        for (n, line) in source.lines().map(str::trim).enumerate() {
            if line.is_empty() {
                continue;
            }
            if let Some(ranks) = line.strip_prefix("> overlays:") {
                for rank in ranks.split(',') {
                    match rank.parse::<Rank>() {
                        Ok(rank) => output.flags.geology_overlays.push(rank),
                        Err(err) => errors.push(format!("line {}: {err}", n + 1)),
                    }
                }
                continue;
            }
            if let Some(marker) = line.strip_prefix('@') {
                let mut parts = marker.splitn(2, '|').map(str::trim);
                let date = parts.next().unwrap_or_default();
                match codec.parse_date_literal(date) {
                    Ok(start) => output.markers.push(Marker {
                        start,
                        content: parts.next().unwrap_or_default().to_owned(),
                    }),
                    Err(err) => errors.push(format!("line {}: {err}", n + 1)),
                }
                continue;
            }

            let parts: Vec<_> = line.splitn(3, '|').map(str::trim).collect();
            let &[start, end, content] = parts.as_slice() else {
                errors.push(format!("line {}: expected `start | end | content`", n + 1));
                continue;
            };
            let dates = codec
                .parse_date_literal(start)
                .and_then(|s| Ok((s, codec.parse_date_literal(end)?)));
            match dates {
                Ok((s, e)) => {
                    let mut item = TimelineItem::new(format!("item-{n}"), content, s).with_end(e);
                    item.is_geological = is_geological_literal(start);
                    output.items.push(item);
                }
                Err(err) => errors.push(format!("line {}: {err}", n + 1)),
            }
        }

        if errors.is_empty() {
            Ok(output)
        } else {
            Err(ParseError::new(errors))
        }
    }
}

/// Prints every call instead of drawing.
#[derive(Default)]
struct ConsoleEngine {
    window: Option<ViewWindow>,
}

impl RenderEngine for ConsoleEngine {
    fn mount(
        &mut self,
        items: &[TimelineItem],
        groups: &[Group],
        options: &EngineOptions,
    ) -> EngineResult<()> {
        println!("mount: {} items, {} lanes", items.len(), groups.len());
        self.window = options.start.zip(options.end).map(|(s, e)| ViewWindow::new(s, e));
        Ok(())
    }

    fn set_groups(&mut self, groups: &[Group]) -> EngineResult<()> {
        println!("set groups ({})", groups.len());
        Ok(())
    }

    fn set_stack(&mut self, stack: bool) -> EngineResult<()> {
        println!("stack = {stack}");
        Ok(())
    }

    fn window(&self) -> EngineResult<ViewWindow> {
        self.window.ok_or_else(|| EngineError("no window yet".to_owned()))
    }

    fn set_window(&mut self, window: &ViewWindow, animate: bool) -> EngineResult<()> {
        println!("window {window} (animate: {animate})");
        self.window = Some(*window);
        Ok(())
    }

    fn redraw(&mut self) -> EngineResult<()> {
        println!("redraw");
        Ok(())
    }

    fn fit(&mut self) -> EngineResult<()> {
        println!("fit");
        Ok(())
    }

    fn add_custom_time(&mut self, at: VirtualDate, id: &str) -> EngineResult<()> {
        println!("marker {id} at {at}");
        Ok(())
    }

    fn set_custom_time_marker(&mut self, id: &str, label: &str) -> EngineResult<()> {
        println!("marker {id} label {label:?}");
        Ok(())
    }

    fn set_custom_time_title(&mut self, id: &str, title: &str) -> EngineResult<()> {
        println!("marker {id} title {title:?}");
        Ok(())
    }
}

const DOCUMENT: &str = "
    252Ma | 201.3Ma | Triassic reptiles
    201.3Ma | 66Ma | Dinosaurs
    @ 66Ma | K-Pg
    > overlays: Era, Period
";

fn main() {
    env_logger::init();

    let settings = TimelineSettings::default();
    let mut timeline = match Timeline::new(ConsoleEngine::default(), LineParser, settings) {
        Ok(timeline) => timeline,
        Err(err) => {
            eprintln!("invalid settings: {err}");
            return;
        }
    };
    timeline.on(EventKind::ItemOver, |event| {
        if let Some(tooltip) = &event.tooltip {
            println!("tooltip: {tooltip}");
        }
    });

    match timeline.render(DOCUMENT) {
        RenderReport::Rendered(summary) => println!("rendered: {summary:?}"),
        RenderReport::ParseFailed(panel) => println!("{panel}"),
        RenderReport::EncodingFailed(err) => println!("cannot encode: {err}"),
        RenderReport::EngineFailed(err) => println!("{err}"),
    }

    timeline.advance(1_000.0);
    timeline.dispatch(EngineEvent::on_item(EventKind::ItemOver, "item-2"));

    if let RenderReport::ParseFailed(panel) = timeline.render("6000Ma | 0Ma | Too old") {
        println!("{panel}");
    }
}
