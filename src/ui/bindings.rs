use crate::scene::material::Color;

/// Every value the debug panel can read or write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Visible,
    Wireframe,
    Color,
    Spin,
    Radius,
    Tube,
    TubularSegments,
    RadialSegments,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    Color(Color),
    Number(f32),
    Trigger,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Control {
    Checkbox,
    ColorPicker,
    Button,
    Slider { min: f32, max: f32, step: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OnChange {
    Nothing,
    ApplyColor,
    Spin,
    RebuildGeometry,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Binding {
    pub label: &'static str,
    pub field: Field,
    pub control: Control,
    pub folder: Option<&'static str>,
    pub on_change: OnChange,
}

pub const KNOT_FOLDER: &str = "TorusKnot";

pub const BINDINGS: [Binding; 8] = [
    Binding {
        label: "visible",
        field: Field::Visible,
        control: Control::Checkbox,
        folder: None,
        on_change: OnChange::Nothing,
    },
    Binding {
        label: "wireframe",
        field: Field::Wireframe,
        control: Control::Checkbox,
        folder: None,
        on_change: OnChange::Nothing,
    },
    Binding {
        label: "color",
        field: Field::Color,
        control: Control::ColorPicker,
        folder: None,
        on_change: OnChange::ApplyColor,
    },
    Binding {
        label: "spin",
        field: Field::Spin,
        control: Control::Button,
        folder: None,
        on_change: OnChange::Spin,
    },
    Binding {
        label: "radius",
        field: Field::Radius,
        control: Control::Slider {
            min: 10.0,
            max: 18.0,
            step: 0.1,
        },
        folder: Some(KNOT_FOLDER),
        on_change: OnChange::RebuildGeometry,
    },
    Binding {
        label: "tube",
        field: Field::Tube,
        control: Control::Slider {
            min: 1.0,
            max: 10.0,
            step: 0.1,
        },
        folder: Some(KNOT_FOLDER),
        on_change: OnChange::RebuildGeometry,
    },
    Binding {
        label: "tubularSegments",
        field: Field::TubularSegments,
        control: Control::Slider {
            min: 32.0,
            max: 400.0,
            step: 1.0,
        },
        folder: Some(KNOT_FOLDER),
        on_change: OnChange::RebuildGeometry,
    },
    Binding {
        label: "radialSegments",
        field: Field::RadialSegments,
        control: Control::Slider {
            min: 3.0,
            max: 40.0,
            step: 0.1,
        },
        folder: Some(KNOT_FOLDER),
        on_change: OnChange::RebuildGeometry,
    },
];

pub fn binding(field: Field) -> &'static Binding {
    BINDINGS
        .iter()
        .find(|b| b.field == field)
        .unwrap_or_else(|| unreachable!("every field has a binding"))
}

impl Binding {
    /// Clamps to the slider range and snaps to its step. Non-numeric
    /// values pass through.
    pub fn constrain(&self, value: Value) -> Value {
        match (self.control, value) {
            (Control::Slider { min, max, step }, Value::Number(v)) => {
                let snapped = if step > 0.0 {
                    min + ((v - min) / step).round() * step
                } else {
                    v
                };
                Value::Number(snapped.clamp(min, max))
            }
            _ => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_panel_contract() {
        let labels: Vec<_> = BINDINGS.iter().map(|b| b.label).collect();
        assert_eq!(
            labels,
            [
                "visible",
                "wireframe",
                "color",
                "spin",
                "radius",
                "tube",
                "tubularSegments",
                "radialSegments"
            ]
        );

        let slider = |field| match binding(field).control {
            Control::Slider { min, max, step } => (min, max, step),
            other => panic!("{field:?} is not a slider: {other:?}"),
        };
        assert_eq!(slider(Field::Radius), (10.0, 18.0, 0.1));
        assert_eq!(slider(Field::Tube), (1.0, 10.0, 0.1));
        assert_eq!(slider(Field::TubularSegments), (32.0, 400.0, 1.0));
        assert_eq!(slider(Field::RadialSegments), (3.0, 40.0, 0.1));
    }

    #[test]
    fn hooks_match_targets() {
        assert_eq!(binding(Field::Visible).on_change, OnChange::Nothing);
        assert_eq!(binding(Field::Wireframe).on_change, OnChange::Nothing);
        assert_eq!(binding(Field::Color).on_change, OnChange::ApplyColor);
        assert_eq!(binding(Field::Spin).control, Control::Button);
        assert_eq!(binding(Field::Spin).on_change, OnChange::Spin);

        for b in BINDINGS.iter().filter(|b| b.folder == Some(KNOT_FOLDER)) {
            assert_eq!(b.on_change, OnChange::RebuildGeometry);
        }
        assert_eq!(
            BINDINGS.iter().filter(|b| b.folder.is_some()).count(),
            4
        );
    }

    #[test]
    fn sliders_clamp_and_snap() {
        let radius = binding(Field::Radius);
        assert_eq!(radius.constrain(Value::Number(40.0)), Value::Number(18.0));
        assert_eq!(radius.constrain(Value::Number(2.0)), Value::Number(10.0));

        let segments = binding(Field::TubularSegments);
        assert_eq!(segments.constrain(Value::Number(64.4)), Value::Number(64.0));

        let visible = binding(Field::Visible);
        assert_eq!(visible.constrain(Value::Bool(false)), Value::Bool(false));
    }
}
