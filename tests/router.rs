mod tests {
    use embassy_time::Instant;
    use segment_light_composer::command::{Route, SegmentField, Target};
    use segment_light_composer::{
        Arg, ColorId, CommandError, Direction, Effect, MoveRange, Segment, dispatch,
    };

    type TestEffect = Effect<4>;

    fn now() -> Instant {
        Instant::from_millis(0)
    }

    /// Effect 1 on a 100 LED strip with segment 9 at position 0
    fn setup() -> TestEffect {
        let mut effect = Effect::new(1, 100, 100, 60);
        dispatch("/effect/1/segment/create", &[Arg::Int(9)], &mut effect, now()).unwrap();
        effect
    }

    fn send(effect: &mut TestEffect, address: &str, args: &[Arg]) -> Result<(), CommandError> {
        dispatch(address, args, effect, now())
    }

    fn segment(effect: &TestEffect) -> &Segment {
        effect.find(9).unwrap()
    }

    fn ints(values: &[i32]) -> Vec<Arg> {
        values.iter().copied().map(Arg::Int).collect()
    }

    #[test]
    fn test_route_parse() {
        assert_eq!(
            Route::parse("/effect/1/segment/-3/color"),
            Some(Route {
                effect: 1,
                target: Target::Segment {
                    id: -3,
                    field: SegmentField::Color,
                },
            })
        );
        assert_eq!(
            Route::parse("/effect/+2/segment/create").map(|route| route.target),
            Some(Target::CreateSegment)
        );
        assert_eq!(
            Route::parse("/effect/2/settings").map(|route| route.target),
            Some(Target::Settings)
        );
        assert_eq!(
            Route::parse("/effect/2/clear").map(|route| route.target),
            Some(Target::Clear)
        );

        for malformed in [
            "",
            "/",
            "effect/1/segment/9/color",
            "/effect/x/segment/9/color",
            "/effect/1/segment/9",
            "/effect/1/segment/9/colour",
            "/effect/1/segment/9/color/extra",
            "/effect/1/segment/+/color",
            "/effect/1/segment/9a/color",
            "/effect/1/segment/99999999999/color",
            "/effects/1/settings",
            "/effect/1/segment/delete/now",
        ] {
            assert_eq!(Route::parse(malformed), None, "{malformed}");
        }
    }

    #[test]
    fn test_create_with_preset_police_lights() {
        let mut effect: TestEffect = Effect::new(1, 100, 100, 60);
        send(&mut effect, "/effect/1/segment/create", &ints(&[9, 0, 0, 99])).unwrap();
        send(&mut effect, "/effect/1/segment/9/preset", &ints(&[3])).unwrap();

        let segment = segment(&effect);
        assert_eq!(
            segment.colors(),
            [ColorId::RED, ColorId::BLUE, ColorId::RED, ColorId::BLUE]
        );
        assert_eq!(segment.move_speed(), 100.0);
        assert_eq!(segment.lengths(), [20, 20, 20]);
        assert_eq!(segment.envelope().as_array(), [0, 100, 100, 200, 200]);
        assert_eq!(segment.move_range(), MoveRange::new(0, 99, 100));
    }

    #[test]
    fn test_create_arguments() {
        let mut effect: TestEffect = Effect::new(1, 100, 50, 60);
        send(&mut effect, "/effect/1/segment/create", &ints(&[1])).unwrap();
        let segment = effect.find(1).unwrap();
        assert_eq!(segment.initial_position(), 0);
        assert_eq!(segment.move_range(), MoveRange::new(0, 49, 50));

        send(&mut effect, "/effect/1/segment/create", &ints(&[2, 7, 300, 10])).unwrap();
        let segment = effect.find(2).unwrap();
        assert_eq!(segment.initial_position(), 7);
        assert_eq!(segment.position(), 7.0);
        let range = segment.move_range();
        assert_eq!((range.min(), range.max()), (10, 49));
    }

    #[test]
    fn test_create_rejections() {
        let mut effect = setup();
        assert_eq!(
            send(&mut effect, "/effect/1/segment/create", &ints(&[9, 50])),
            Err(CommandError::DuplicateSegment(9))
        );
        assert_eq!(segment(&effect).initial_position(), 0);

        assert_eq!(
            send(&mut effect, "/effect/1/segment/create", &[]),
            Err(CommandError::MissingArguments {
                expected: 1,
                received: 0
            })
        );
        assert_eq!(
            send(&mut effect, "/effect/1/segment/create", &[Arg::Float(2.0)]),
            Err(CommandError::InvalidArgument { index: 0 })
        );

        for id in 10..13 {
            send(&mut effect, "/effect/1/segment/create", &ints(&[id])).unwrap();
        }
        let before = effect.segments().to_vec();
        assert_eq!(
            send(&mut effect, "/effect/1/segment/create", &ints(&[13])),
            Err(CommandError::CapacityExceeded)
        );
        assert_eq!(effect.segments(), before.as_slice());
    }

    #[test]
    fn test_delete() {
        let mut effect = setup();
        send(&mut effect, "/effect/1/segment/create", &ints(&[10])).unwrap();
        send(&mut effect, "/effect/1/segment/create", &ints(&[11])).unwrap();

        send(&mut effect, "/effect/1/segment/delete", &ints(&[10])).unwrap();
        let ids: Vec<_> = effect.iter().map(Segment::id).collect();
        assert_eq!(ids, vec![9, 11]);

        assert_eq!(
            send(&mut effect, "/effect/1/segment/delete", &ints(&[10])),
            Err(CommandError::SegmentNotFound(10))
        );
        assert_eq!(effect.len(), 2);
    }

    #[test]
    fn test_deleted_id_can_be_created_again() {
        let mut effect = setup();
        send(&mut effect, "/effect/1/segment/9/color", &ints(&[7, 7, 7, 7])).unwrap();
        send(&mut effect, "/effect/1/segment/delete", &ints(&[9])).unwrap();
        send(&mut effect, "/effect/1/segment/create", &ints(&[9, 4])).unwrap();

        // A fresh segment, nothing carried over from the deleted one
        let segment = segment(&effect);
        assert_eq!(segment.initial_position(), 4);
        assert_eq!(
            segment.colors(),
            [ColorId::RED, ColorId::GREEN, ColorId::BLUE, ColorId::YELLOW]
        );
        assert_eq!(effect.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut effect = setup();
        send(&mut effect, "/effect/1/segment/create", &ints(&[10])).unwrap();
        send(&mut effect, "/effect/1/clear", &[]).unwrap();
        assert!(effect.is_empty());
    }

    #[test]
    fn test_color_is_clamped() {
        let mut effect = setup();
        send(&mut effect, "/effect/1/segment/9/color", &ints(&[-4, 7, 10, 42])).unwrap();
        assert_eq!(
            segment(&effect).colors(),
            [ColorId::BLACK, ColorId::WHITE, ColorId::LIGHT_BLUE, ColorId::LIGHT_BLUE]
        );
    }

    #[test]
    fn test_short_color_leaves_segment_unchanged() {
        let mut effect = setup();
        let before = segment(&effect).colors();
        assert_eq!(
            send(&mut effect, "/effect/1/segment/9/color", &ints(&[5, 5, 5])),
            Err(CommandError::MissingArguments {
                expected: 4,
                received: 3
            })
        );
        assert_eq!(segment(&effect).colors(), before);
    }

    #[test]
    fn test_wrong_typed_argument_leaves_segment_unchanged() {
        let mut effect = setup();
        let before = segment(&effect).clone();
        let args = [Arg::Int(5), Arg::Int(5), Arg::Float(5.0), Arg::Int(5)];
        assert_eq!(
            send(&mut effect, "/effect/1/segment/9/color", &args),
            Err(CommandError::InvalidArgument { index: 2 })
        );
        assert_eq!(segment(&effect), &before);
    }

    #[test]
    fn test_transparency() {
        let mut effect = setup();
        let args = [Arg::Float(-0.5), Arg::Float(0.25), Arg::Int(1), Arg::Float(3.0)];
        send(&mut effect, "/effect/1/segment/9/transparency", &args).unwrap();
        assert_eq!(segment(&effect).transparencies(), [0.0, 0.25, 1.0, 1.0]);

        let args = [Arg::Float(0.1), Arg::Float(f32::NAN), Arg::Float(0.1), Arg::Float(0.1)];
        assert_eq!(
            send(&mut effect, "/effect/1/segment/9/transparency", &args),
            Err(CommandError::InvalidArgument { index: 1 })
        );
        assert_eq!(segment(&effect).transparencies(), [0.0, 0.25, 1.0, 1.0]);
    }

    #[test]
    fn test_length_is_floored() {
        let mut effect = setup();
        send(&mut effect, "/effect/1/segment/9/length", &ints(&[0, -7, 12])).unwrap();
        assert_eq!(segment(&effect).lengths(), [1, 1, 12]);

        send(&mut effect, "/effect/1/segment/9/length", &ints(&[5, 6, 100_000])).unwrap();
        assert_eq!(segment(&effect).lengths(), [5, 6, u16::MAX]);
    }

    #[test]
    fn test_move_speed_toggles_direction_on_sign_flip() {
        let mut effect = setup();
        assert_eq!(segment(&effect).direction(), Direction::Forward);

        send(&mut effect, "/effect/1/segment/9/move_speed", &[Arg::Float(-12.5)]).unwrap();
        assert_eq!(segment(&effect).move_speed(), -12.5);
        assert_eq!(segment(&effect).direction(), Direction::Backward);

        send(&mut effect, "/effect/1/segment/9/move_speed", &[Arg::Int(0)]).unwrap();
        send(&mut effect, "/effect/1/segment/9/move_speed", &[Arg::Int(30)]).unwrap();
        assert_eq!(segment(&effect).move_speed(), 30.0);
        assert_eq!(segment(&effect).direction(), Direction::Backward);

        assert_eq!(
            send(&mut effect, "/effect/1/segment/9/move_speed", &[Arg::Float(f32::INFINITY)]),
            Err(CommandError::InvalidArgument { index: 0 })
        );
        assert_eq!(segment(&effect).move_speed(), 30.0);
    }

    #[test]
    fn test_move_range_is_swapped_and_clamped() {
        let mut effect = setup();
        send(&mut effect, "/effect/1/segment/9/move_range", &ints(&[150, 40])).unwrap();
        let range = segment(&effect).move_range();
        assert_eq!((range.min(), range.max()), (40, 99));
    }

    #[test]
    fn test_initial_position() {
        let mut effect = setup();
        send(&mut effect, "/effect/1/segment/9/initial_position", &ints(&[33])).unwrap();
        assert_eq!(segment(&effect).initial_position(), 33);
        assert_eq!(segment(&effect).position(), 33.0);
    }

    #[test]
    fn test_is_edge_reflect() {
        let mut effect = setup();
        send(&mut effect, "/effect/1/segment/9/is_edge_reflect", &ints(&[1])).unwrap();
        assert!(segment(&effect).is_edge_reflect());
        send(&mut effect, "/effect/1/segment/9/is_edge_reflect", &[Arg::Bool(false)]).unwrap();
        assert!(!segment(&effect).is_edge_reflect());
        send(&mut effect, "/effect/1/segment/9/is_edge_reflect", &ints(&[-2])).unwrap();
        assert!(segment(&effect).is_edge_reflect());
        assert_eq!(
            send(&mut effect, "/effect/1/segment/9/is_edge_reflect", &[Arg::Float(1.0)]),
            Err(CommandError::InvalidArgument { index: 0 })
        );
    }

    #[test]
    fn test_dimmer_time_is_repaired() {
        let mut effect = setup();
        send(&mut effect, "/effect/1/segment/9/dimmer_time", &ints(&[100, 100, 50, 40, 0])).unwrap();

        let envelope = segment(&effect).envelope();
        assert!(envelope.fade_in_end() > envelope.fade_in_start());
        assert!(envelope.fade_out_end() > envelope.fade_out_start());
        assert_eq!(envelope.cycle(), 1000);
        assert_eq!(envelope.as_array(), [100, 101, 102, 103, 1000]);

        assert_eq!(
            send(&mut effect, "/effect/1/segment/9/dimmer_time", &ints(&[0, 1, 2, 3])),
            Err(CommandError::MissingArguments {
                expected: 5,
                received: 4
            })
        );
        assert_eq!(segment(&effect).envelope().as_array(), [100, 101, 102, 103, 1000]);
    }

    #[test]
    fn test_unknown_preset_changes_nothing() {
        let mut effect = setup();
        let before = segment(&effect).clone();
        for raw in [0, 6, -1] {
            assert_eq!(
                send(&mut effect, "/effect/1/segment/9/preset", &ints(&[raw])),
                Err(CommandError::UnknownPreset(raw))
            );
        }
        assert_eq!(segment(&effect), &before);
    }

    #[test]
    fn test_preset_keeps_unnamed_fields() {
        let mut effect = setup();
        send(&mut effect, "/effect/1/segment/9/length", &ints(&[3, 4, 5])).unwrap();
        send(&mut effect, "/effect/1/segment/9/is_edge_reflect", &ints(&[1])).unwrap();

        // Rainbow flow leaves lengths alone and turns reflection off
        send(&mut effect, "/effect/1/segment/9/preset", &ints(&[1])).unwrap();
        let segment = segment(&effect);
        assert_eq!(segment.lengths(), [3, 4, 5]);
        assert!(!segment.is_edge_reflect());
        assert_eq!(segment.envelope().as_array(), [0, 500, 4500, 5000, 5000]);

        // Breathing keeps reflection as it was
        send(&mut effect, "/effect/1/segment/9/is_edge_reflect", &ints(&[1])).unwrap();
        send(&mut effect, "/effect/1/segment/9/preset", &ints(&[2])).unwrap();
        let segment = effect.find(9).unwrap();
        assert!(segment.is_edge_reflect());
        assert_eq!(segment.colors(), [ColorId::WHITE; 4]);
        assert_eq!(segment.lengths(), [1, 1, 1]);
    }

    #[test]
    fn test_settings() {
        let mut effect = setup();
        send(&mut effect, "/effect/1/settings", &ints(&[40, 30])).unwrap();
        assert_eq!(effect.led_count(), 40);
        assert_eq!(effect.fps(), 30);
        assert_eq!(segment(&effect).move_range().max(), 39);

        send(&mut effect, "/effect/1/settings", &ints(&[1000, 1000])).unwrap();
        assert_eq!(effect.led_count(), 100);
        assert_eq!(effect.fps(), 120);

        assert_eq!(
            send(&mut effect, "/effect/1/settings", &ints(&[10])),
            Err(CommandError::MissingArguments {
                expected: 2,
                received: 1
            })
        );
        assert_eq!(effect.led_count(), 100);
    }

    #[test]
    fn test_extra_arguments_are_ignored() {
        let mut effect = setup();
        send(&mut effect, "/effect/1/segment/9/initial_position", &ints(&[5, 6, 7])).unwrap();
        assert_eq!(segment(&effect).initial_position(), 5);
    }

    #[test]
    fn test_referential_misses() {
        let mut effect = setup();
        let before = segment(&effect).clone();

        assert_eq!(
            send(&mut effect, "/effect/2/segment/9/color", &ints(&[0, 0, 0, 0])),
            Err(CommandError::EffectMismatch {
                expected: 1,
                received: 2
            })
        );
        assert_eq!(
            send(&mut effect, "/effect/1/segment/8/color", &ints(&[0, 0, 0, 0])),
            Err(CommandError::SegmentNotFound(8))
        );
        assert_eq!(
            send(&mut effect, "/effect/1/segment/9/hue", &ints(&[0])),
            Err(CommandError::MalformedAddress)
        );
        assert_eq!(segment(&effect), &before);
        assert_eq!(effect.len(), 1);
    }
}
