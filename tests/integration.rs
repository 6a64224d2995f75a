use geochron::{
    build_overlay_lanes, find_at, format_display, format_range, parse_geological_literal,
    period_for_ma, validate, AxisFormatter, AxisScale, CodecConfig, GeoError, Group, Ma, Rank,
    TimeCodec, VirtualDate, GEOLOGICAL_TIME_SCALE,
};

#[test]
fn codec_round_trips_on_the_virtual_year_grid() {
    let codec = TimeCodec::default();
    // multiples of 1/k are exact
    for step in (0..=92_000u32).step_by(7) {
        let ma = Ma::new(f64::from(step) / 20.0);
        let back = codec.date_to_ma(&codec.ma_to_date(ma).unwrap());
        assert_eq!(back, ma);
    }
}

#[test]
fn codec_error_is_bounded_off_grid() {
    let codec = TimeCodec::default();
    for ma in [0.013, 1.234_567, 66.049, 251.902, 4_599.99] {
        let back = codec.date_to_ma(&codec.ma_to_date(Ma::new(ma)).unwrap());
        assert!((back.value() - ma).abs() <= 0.5 / 20.0 + 1e-12);
    }
}

#[test]
fn older_ages_map_to_earlier_dates() {
    let codec = TimeCodec::default();
    let mut previous = codec.ma_to_date(Ma::PRESENT).unwrap();
    for ma in [0.5, 1.0, 66.0, 252.0, 541.0, 2_500.0, 4_600.0] {
        let date = codec.ma_to_date(Ma::new(ma)).unwrap();
        assert!(date < previous, "{ma} Ma should precede the previous sample");
        previous = date;
    }
}

#[test]
fn iso_strings_round_trip_through_the_codec() {
    let codec = TimeCodec::default();
    let iso = codec.ma_to_iso(Ma::new(4_600.0)).unwrap();
    assert_eq!(iso, "-090000-01-01T00:00:00Z");
    assert_eq!(codec.iso_to_ma(&iso).unwrap(), Ma::new(4_600.0));
    assert_eq!(codec.ma_to_iso(Ma::new(66.0)).unwrap(), "0680-01-01T00:00:00Z");
}

#[test]
fn custom_compression_changes_the_encoding() {
    let codec = TimeCodec::new(&CodecConfig {
        present_year: 2000,
        virtual_years_per_ma: 10.0,
    })
    .unwrap();
    assert_eq!(codec.ma_to_year(Ma::new(100.0)).unwrap(), 1000);
    assert!(TimeCodec::new(&CodecConfig {
        present_year: 2000,
        virtual_years_per_ma: 0.0,
    })
    .is_err());
}

#[test]
fn display_thresholds() {
    assert_eq!(format_display(Ma::PRESENT), "Present");
    assert_eq!(format_display(Ma::new(0.0005)), "500 years ago");
    assert_eq!(format_display(Ma::new(0.5)), "500.0 Ka");
    assert_eq!(format_display(Ma::new(5.0)), "5.00 Ma");
    assert_eq!(format_display(Ma::new(50.0)), "50.0 Ma");
    assert_eq!(format_display(Ma::new(500.0)), "500 Ma");
    assert_eq!(format_display(Ma::new(2_000.0)), "2.00 Ga");
    assert_eq!(
        format_range(Ma::new(252.0), Ma::new(66.0)),
        "252 Ma - 66.0 Ma"
    );
}

#[test]
fn literals_validate_against_the_domain() {
    assert_eq!(parse_geological_literal("66.0Ma").unwrap(), Ma::new(66.0));
    assert!(matches!(
        parse_geological_literal("66"),
        Err(GeoError::Format { .. })
    ));
    assert!(matches!(
        validate(Ma::new(5_000.0)),
        Err(GeoError::Range { .. })
    ));
    assert!(matches!(validate(Ma::new(-1.0)), Err(GeoError::Range { .. })));
    assert!(validate(Ma::new(4_600.0)).is_ok());
}

#[test]
fn catalog_units_nest_inside_their_parents() {
    for unit in GEOLOGICAL_TIME_SCALE {
        assert!(unit.start.value() > unit.end.value(), "{}", unit.name);
        if let Some(parent) = unit.parent_period() {
            assert!(parent.rank <= unit.rank, "{} under {}", unit.name, parent.name);
            assert!(parent.start.value() >= unit.start.value());
            assert!(parent.end.value() <= unit.end.value());
        }
    }
}

#[test]
fn catalog_lookup_by_age() {
    assert_eq!(find_at(Ma::new(150.0), Some(Rank::Period)).unwrap().name, "Jurassic");
    assert_eq!(find_at(Ma::new(150.0), Some(Rank::Era)).unwrap().name, "Mesozoic");
    assert_eq!(period_for_ma(Ma::new(300.0)).unwrap().name, "Carboniferous");
    assert!(find_at(Ma::new(5_000.0), None).is_none());
}

#[test]
fn overlay_lanes_follow_existing_lanes() {
    let existing = [Group::new(3, "Life"), Group::new(7, "Climate")];
    let lanes =
        build_overlay_lanes(&[Rank::Period, Rank::Era], &existing, &TimeCodec::default()).unwrap();
    let ids: Vec<_> = lanes.groups.iter().map(|g| g.id).collect();
    assert_eq!(ids, [8, 9]);
    assert!(lanes.items.iter().all(|i| i.is_overlay()));
}

#[test]
fn axis_labels_switch_on_the_era() {
    let codec = TimeCodec::default();
    let axis = AxisFormatter::new(&codec);
    let deep = codec.ma_to_date(Ma::new(541.0)).unwrap();
    assert_eq!(axis.label(&deep, AxisScale::Year), "541 Ma");
    let modern = VirtualDate::from_ymd(1990, 10, 3).unwrap();
    assert_eq!(axis.label(&modern, AxisScale::Month), "1990-10");
}

#[cfg(feature = "serde")]
mod serde_support {
    use geochron::{
        Flags, ItemKind, Ma, Rank, TimelineItem, TimelineSettings, VirtualDate, ViewWindow,
    };

    #[test]
    fn virtual_dates_serialize_as_padded_iso() {
        let date = VirtualDate::from_year(-3_040).unwrap();
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, "\"-003040-01-01T00:00:00Z\"");
        let back: VirtualDate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, date);
    }

    #[test]
    fn items_use_engine_field_names() {
        let item = TimelineItem::new("bg", "Backdrop", VirtualDate::from_year(1_000).unwrap())
            .with_kind(ItemKind::Background);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "background");
        assert_eq!(json["start"], "1000-01-01T00:00:00Z");
    }

    #[test]
    fn settings_and_flags_fill_defaults() {
        let settings: TimelineSettings = serde_json::from_str(r#"{"locale": "fr"}"#).unwrap();
        assert_eq!(settings.locale, "fr");
        assert_eq!(settings.codec, TimelineSettings::default().codec);

        let flags: Flags =
            serde_json::from_str(r#"{"no_today": true, "geology_overlays": ["Era"]}"#).unwrap();
        assert!(flags.no_today);
        assert_eq!(flags.geology_overlays, [Rank::Era]);
        assert!(flags.default_view.is_none());
    }

    #[test]
    fn windows_and_ages_serialize_plainly() {
        let window = ViewWindow::new(
            VirtualDate::from_year(1_000).unwrap(),
            VirtualDate::from_year(2_000).unwrap(),
        );
        let json = serde_json::to_value(window).unwrap();
        assert_eq!(json["end"], "2000-01-01T00:00:00Z");
        assert_eq!(serde_json::to_string(&Ma::new(66.0)).unwrap(), "66.0");
    }
}
