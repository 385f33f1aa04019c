pub const INDEX: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Image Recognition</title>
    <link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css" rel="stylesheet">
</head>
<body class="bg-light">
    <div class="container py-5" style="max-width: 720px">
        <h1 class="mb-2">Image Recognition</h1>
        <p class="text-muted mb-4">Upload a PNG or JPEG and get the top predictions. <a href="/api/docs">API docs</a></p>

        <form id="uploadForm" class="card card-body mb-4">
            <input class="form-control mb-3" type="file" id="imageInput" accept="image/png,image/jpeg">
            <button type="submit" class="btn btn-primary" id="submitBtn">
                <span class="spinner-border spinner-border-sm d-none" role="status"></span>
                <span class="label">Analyze Image</span>
            </button>
        </form>

        <div id="error" class="alert alert-danger d-none"></div>

        <div id="preview" class="mb-4 d-none">
            <img id="previewImage" class="img-fluid rounded shadow-sm" alt="Preview">
        </div>

        <div id="results" class="d-none">
            <h5>Predictions</h5>
            <div id="resultsList" class="list-group"></div>
        </div>
    </div>

    <script>
        const form = document.getElementById('uploadForm');
        const imageInput = document.getElementById('imageInput');
        const preview = document.getElementById('preview');
        const previewImage = document.getElementById('previewImage');
        const results = document.getElementById('results');
        const resultsList = document.getElementById('resultsList');
        const errorBox = document.getElementById('error');
        const submitBtn = document.getElementById('submitBtn');
        const spinner = submitBtn.querySelector('.spinner-border');
        const label = submitBtn.querySelector('.label');
        let inFlight = false;

        imageInput.addEventListener('change', (e) => {
            const file = e.target.files[0];
            if (!file) return;
            const reader = new FileReader();
            reader.onload = (ev) => {
                previewImage.src = ev.target.result;
                preview.classList.remove('d-none');
            };
            reader.onerror = () => console.warn('preview unavailable', reader.error);
            reader.readAsDataURL(file);
        });

        form.addEventListener('submit', async (e) => {
            e.preventDefault();
            if (inFlight) return;

            const file = imageInput.files[0];
            if (!file) {
                showError('Please select an image first.');
                return;
            }

            const formData = new FormData();
            formData.append('image', file);

            setLoading(true);
            errorBox.classList.add('d-none');
            results.classList.add('d-none');

            try {
                const response = await fetch('/detect', { method: 'POST', body: formData });
                const data = await response.json();
                if (!response.ok || !data.predictions) {
                    throw new Error(data.error || 'Error processing image');
                }
                render(data.predictions);
            } catch (err) {
                showError(err.message);
            } finally {
                setLoading(false);
            }
        });

        // Shifts the decimal on the shortest text form so 97.345 reads 97.35.
        // Exponent forms (5e-7) cannot be shifted that way; toFixed is exact enough there.
        function formatConfidence(value) {
            const text = String(value);
            if (text.includes('e')) {
                return value.toFixed(2) + '%';
            }
            const rounded = Math.round(Number(text + 'e2')) / 100;
            return rounded.toFixed(2) + '%';
        }

        function render(predictions) {
            resultsList.innerHTML = '';
            predictions.forEach((pred) => {
                const item = document.createElement('div');
                item.className = 'list-group-item d-flex justify-content-between align-items-center';
                item.append(document.createTextNode(pred.label));
                const badge = document.createElement('span');
                badge.className = 'badge bg-primary rounded-pill';
                badge.textContent = formatConfidence(pred.confidence);
                item.append(badge);
                resultsList.append(item);
            });
            results.classList.remove('d-none');
        }

        function showError(message) {
            errorBox.textContent = message;
            errorBox.classList.remove('d-none');
        }

        function setLoading(isLoading) {
            inFlight = isLoading;
            submitBtn.disabled = isLoading;
            spinner.classList.toggle('d-none', !isLoading);
            label.textContent = isLoading ? 'Processing...' : 'Analyze Image';
        }
    </script>
</body>
</html>
"#;

pub const API_DOCS: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Image Recognition API</title>
    <link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css" rel="stylesheet">
</head>
<body>
    <div class="container py-5" style="max-width: 720px">
        <h1>API</h1>

        <h4 class="mt-4"><code>POST /detect</code></h4>
        <p>Multipart form data with one file field named <code>image</code>. PNG and JPEG only.</p>

        <h5>200 OK</h5>
<pre class="bg-light p-3"><code>{
  "predictions": [
    { "label": "tabby", "confidence": 61.02 },
    { "label": "tiger cat", "confidence": 20.47 }
  ]
}</code></pre>
        <p>Confidence is a percentage. Predictions are ranked, highest first.
        The page shows two decimals: <code>97.345</code> reads <code>97.35%</code>, <code>5e-7</code> reads <code>0.00%</code>.</p>

        <h5>Errors</h5>
        <table class="table table-sm">
            <thead><tr><th>Status</th><th><code>error</code></th></tr></thead>
            <tbody>
                <tr><td>400</td><td>No image provided</td></tr>
                <tr><td>400</td><td>No selected file</td></tr>
                <tr><td>400</td><td>Invalid file type</td></tr>
                <tr><td>413</td><td>&lt;size limit message&gt;</td></tr>
                <tr><td>500</td><td>Error processing image: &lt;cause&gt;</td></tr>
                <tr><td>503</td><td>Image processing service is not available</td></tr>
            </tbody>
        </table>

        <h5>Example</h5>
<pre class="bg-light p-3"><code>curl -F image=@cat.jpg http://localhost:5000/detect</code></pre>
    </div>
</body>
</html>
"#;
