use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;
use crate::path::Segment;

fn text(s: &str) -> TemplatePart {
	TemplatePart::Text(s.to_string())
}

fn var(name: &str, default: Option<&str>) -> TemplatePart {
	TemplatePart::Var {
		name: name.to_string(),
		default: default.map(str::to_string),
	}
}

#[rstest]
#[case("$model", "model")]
#[case("$model.encoder", "model.encoder")]
#[case("$layers.0", "layers.0")]
#[case("$_private", "_private")]
#[case("$data_loader.Vocab.size", "data_loader.Vocab.size")]
fn references(#[case] input: &str, #[case] dotted: &str) {
	let reference = parse_reference(input).expect("reference");
	assert_eq!(reference.target(), &ConfigPath::parse_dotted(dotted));
	assert_eq!(reference.to_string(), input);
}

#[rstest]
#[case("model")]
#[case("$HOME")]
#[case("$Model")]
#[case("$$model")]
#[case("$model/weights.bin")]
#[case("$model.")]
#[case("$model..x")]
#[case("$1st")]
#[case("$")]
#[case("prefix $model")]
fn not_references(#[case] input: &str) {
	assert_eq!(parse_reference(input), None);
}

#[test]
fn digit_segments_keep_their_spelling() {
	let reference = parse_reference("$layers.02.weight").expect("reference");
	assert_eq!(reference.target().segments()[1], Segment::Key("02".to_string()));
	assert_eq!(reference.to_string(), "$layers.02.weight");
}

#[rstest]
#[case("$HOME/data.csv", vec![var("HOME", None), text("/data.csv")])]
#[case("${HOME}/data.csv", vec![var("HOME", None), text("/data.csv")])]
#[case("${DATA_DIR:-/tmp/data}/train", vec![var("DATA_DIR", Some("/tmp/data")), text("/train")])]
#[case("$DATA_DIR:-/tmp/data done", vec![var("DATA_DIR", Some("/tmp/data")), text(" done")])]
#[case("$A$B", vec![var("A", None), var("B", None)])]
#[case("cost: $$5", vec![text("cost: $5")])]
#[case("$$HOME", vec![text("$HOME")])]
#[case("$model/x", vec![text("$model/x")])]
#[case("$HOMEdir", vec![text("$HOMEdir")])]
#[case("${home}", vec![text("${home}")])]
#[case("${HOME", vec![text("${HOME")])]
#[case("trailing $", vec![text("trailing $")])]
#[case("", vec![])]
fn templates(#[case] input: &str, #[case] expected: Vec<TemplatePart>) {
	assert_eq!(parse_template(input).segments, expected);
}

#[rstest]
#[case("HOME", true)]
#[case("MODEL_DIR", true)]
#[case("CUDA_VISIBLE_DEVICES2", true)]
#[case("Home", false)]
#[case("_HOME", false)]
#[case("1HOME", false)]
#[case("", false)]
fn env_names(#[case] name: &str, #[case] expected: bool) {
	assert_eq!(is_env_name(name), expected);
}

#[test]
fn template_display_is_reparseable() {
	let template = parse_template("$$ ${A:-x}/$B end");
	assert_eq!(template.to_string(), "$$ ${A:-x}/${B} end");
	assert_eq!(parse_template(&template.to_string()), template);
}
