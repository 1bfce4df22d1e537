use gesture_recognizers::{
    BodyJoint, BodyMeasurement, ChangeDirection, ChangeType, CombinationRecognizer,
    CorrectionHint, FingerCountParams, FingerCountRecognizer, GestureRecognizer, HandSide,
    HistoryAnchor, JointRelationRecognizer, LengthBounds, LinearMovementParams,
    LinearMovementRecognizer, RecognitionResult, RecognizerConfig, RelationBounds, SubjectBuffer,
    TrackingData, Vec3,
};

fn pose(time: f64, joints: &[(BodyJoint, Vec3)]) -> TrackingData {
    let mut frame = TrackingData::body(time);
    for &(joint, position) in joints {
        frame.set_position(joint, position, 0.9);
    }
    frame
}

fn arm_out(time: f64, right_hand: Vec3) -> TrackingData {
    pose(
        time,
        &[
            (BodyJoint::Head, Vec3::new(0.0, 600.0, 0.0)),
            (BodyJoint::RightShoulder, Vec3::new(200.0, 400.0, 0.0)),
            (BodyJoint::RightHand, right_hand),
        ],
    )
}

#[test]
fn test_both_wrists_away_from_shoulders() {
    let mut user = SubjectBuffer::user(1, 16);
    user.push_frame(pose(
        0.0,
        &[
            (BodyJoint::RightShoulder, Vec3::new(200.0, 400.0, 0.0)),
            (BodyJoint::RightWrist, Vec3::new(500.0, 400.0, 0.0)),
            (BodyJoint::LeftShoulder, Vec3::new(-200.0, 400.0, 0.0)),
            (BodyJoint::LeftWrist, Vec3::new(-200.0, 100.0, 0.0)),
        ],
    ));

    let bounds = RelationBounds::distance(250.0, f32::INFINITY);
    let mut recognizers: Vec<Box<dyn GestureRecognizer>> = vec![
        Box::new(
            JointRelationRecognizer::new(
                BodyJoint::RightWrist,
                Some(BodyJoint::RightShoulder.into()),
                bounds,
                RecognizerConfig::default(),
            )
            .unwrap(),
        ),
        Box::new(
            JointRelationRecognizer::new(
                BodyJoint::LeftWrist,
                Some(BodyJoint::LeftShoulder.into()),
                bounds,
                RecognizerConfig::default(),
            )
            .unwrap(),
        ),
    ];

    for recognizer in &mut recognizers {
        let mut hint = CorrectionHint::default();
        assert_eq!(
            recognizer.recognize(user.target(), Some(&mut hint)),
            RecognitionResult::Recognized
        );
        assert_eq!(hint, CorrectionHint::default(), "hint untouched on success");
    }
}

#[test]
fn test_hand_moving_right() {
    let mut rec = LinearMovementRecognizer::new(
        BodyJoint::RightHand,
        Some(BodyJoint::RightShoulder.into()),
        LinearMovementParams::velocity(250.0, f32::INFINITY).with_direction(Vec3::x()),
        RecognizerConfig::default(),
    )
    .unwrap();

    let mut user = SubjectBuffer::user(1, 16);
    user.push_frame(arm_out(0.0, Vec3::new(500.0, 400.0, 0.0)));
    user.push_frame(arm_out(0.1, Vec3::new(530.0, 400.0, 0.0)));
    assert_eq!(rec.recognize(user.target(), None), RecognitionResult::Recognized);

    // Slightly too slow: 124 over 0.5 s is 248 units/s.
    let mut user = SubjectBuffer::user(1, 16);
    user.push_frame(arm_out(0.0, Vec3::new(500.0, 400.0, 0.0)));
    user.push_frame(arm_out(0.5, Vec3::new(624.0, 400.0, 0.0)));
    let mut hint = CorrectionHint::default();
    assert_eq!(
        rec.recognize(user.target(), Some(&mut hint)),
        RecognitionResult::NotRecognized
    );
    assert_eq!(hint.change_type, ChangeType::Speed);
    assert_eq!(hint.change_direction, ChangeDirection::More);
}

#[test]
fn test_swipe_length_in_shoulder_widths() {
    let mut rec = LinearMovementRecognizer::new(
        BodyJoint::RightHand,
        None,
        LinearMovementParams::velocity(0.5, f32::INFINITY)
            .with_direction(Vec3::x())
            .with_measuring_unit(BodyMeasurement::ShoulderWidth),
        RecognizerConfig::default(),
    )
    .unwrap()
    .with_length(LengthBounds::new(0.75, 2.0).with_measuring_unit(BodyMeasurement::ShoulderWidth))
    .unwrap();

    let mut user = SubjectBuffer::user(1, 16);
    user.set_body_measurement(BodyMeasurement::ShoulderWidth, 400.0, 0.9);
    user.push_frame(arm_out(0.0, Vec3::new(0.0, 400.0, 0.0)));

    let mut anchor = HistoryAnchor::default();
    let mut results = Vec::new();
    for i in 1..=3 {
        let x = i as f32 * 100.0;
        user.push_frame(arm_out(i as f64 * 0.1, Vec3::new(x, 400.0, 0.0)));
        results.push(anchor.recognize(&mut rec, user.target(), None));
    }
    assert_eq!(
        results,
        [
            RecognitionResult::WaitingForLastStateToFinish,
            RecognitionResult::WaitingForLastStateToFinish,
            RecognitionResult::Recognized,
        ]
    );
    assert!(!anchor.is_started());

    user.set_body_measurement(BodyMeasurement::ShoulderWidth, 400.0, 0.2);
    user.push_frame(arm_out(0.4, Vec3::new(400.0, 400.0, 0.0)));
    assert_eq!(
        anchor.recognize(&mut rec, user.target(), None),
        RecognitionResult::TrackingError
    );
}

#[test]
fn test_unknown_finger_count() {
    let mut user = SubjectBuffer::user(3, 16);
    user.push_frame(arm_out(0.0, Vec3::new(500.0, 400.0, 0.0)));
    user.push_finger_count(HandSide::Right, -1);

    for (min, max) in [(0, 5), (0, 0), (-1, 5)] {
        let mut rec = FingerCountRecognizer::for_user(
            BodyJoint::RightHand,
            FingerCountParams::new(min, max),
            RecognizerConfig::default(),
        )
        .unwrap();
        let result = rec.recognize(user.target(), None);
        assert_eq!(result, RecognitionResult::NotRecognized, "bounds {min}..{max}");
    }
}

#[test]
fn test_raise_then_swipe() {
    let raised = JointRelationRecognizer::new(
        BodyJoint::RightHand,
        Some(BodyJoint::Head.into()),
        RelationBounds::boxed(
            Vec3::new(f32::NEG_INFINITY, 100.0, f32::NEG_INFINITY),
            Vec3::repeat(f32::INFINITY),
        ),
        RecognizerConfig::default(),
    )
    .unwrap();
    let swipe = LinearMovementRecognizer::new(
        BodyJoint::RightHand,
        None,
        LinearMovementParams::velocity(200.0, f32::INFINITY).with_direction(Vec3::x()),
        RecognizerConfig::default(),
    )
    .unwrap();

    let mut combination = CombinationRecognizer::new("raise_then_swipe");
    combination
        .add_state(vec![Box::new(raised.clone())], vec![], 0.2, 2.0, 1.0)
        .unwrap();
    combination
        .add_state(
            vec![Box::new(raised), Box::new(swipe)],
            vec![],
            0.0,
            f64::INFINITY,
            f64::INFINITY,
        )
        .unwrap();

    let mut user = SubjectBuffer::user(1, 16);
    let mut results = Vec::new();
    for i in 0..6 {
        let x = if i < 4 { 0.0 } else { (i - 3) as f32 * 50.0 };
        user.push_frame(arm_out(i as f64 * 0.1, Vec3::new(x, 800.0, 0.0)));
        results.push(combination.update(user.target(), None));
    }

    use RecognitionResult::{Recognized as Yes, WaitingForLastStateToFinish as Wait};
    assert_eq!(results, [Wait, Wait, Wait, Wait, Wait, Yes]);
    assert!(!combination.is_active());
}

#[test]
fn test_cloned_recognizers_are_independent() {
    let mut combination = CombinationRecognizer::new("hold_high");
    let raised = JointRelationRecognizer::new(
        BodyJoint::RightHand,
        Some(BodyJoint::Head.into()),
        RelationBounds::boxed(
            Vec3::new(f32::NEG_INFINITY, 100.0, f32::NEG_INFINITY),
            Vec3::repeat(f32::INFINITY),
        ),
        RecognizerConfig::default(),
    )
    .unwrap();
    combination
        .add_state(vec![Box::new(raised)], vec![], 1.0, f64::INFINITY, f64::INFINITY)
        .unwrap();

    let prototype: Box<dyn GestureRecognizer> = Box::new(combination);
    let mut first = prototype.clone();
    let mut second = prototype.clone();

    let mut user = SubjectBuffer::user(1, 4);
    user.push_frame(arm_out(0.0, Vec3::new(0.0, 800.0, 0.0)));
    assert_eq!(
        first.recognize(user.target(), None),
        RecognitionResult::WaitingForLastStateToFinish
    );

    let mut other = SubjectBuffer::user(2, 4);
    other.push_frame(arm_out(0.0, Vec3::new(0.0, 0.0, 0.0)));
    assert_eq!(second.recognize(other.target(), None), RecognitionResult::NotRecognized);
}
